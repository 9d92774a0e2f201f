//! End-to-end flows a liquidity pool drives through the engine

use cquote::config::Config;
use cquote::fixed::Fixed64x64;
use cquote::model::{log_return, PricingParameters, VolatilityState};
use cquote::quote::CLevelState;
use cquote::token::{from_decimals, to_decimals};
use rust_decimal_macros::dec;

const HOUR: u64 = 3_600;

#[test]
fn test_price_feed_to_quote() {
    let config: Config = toml::from_str(
        r#"
        [pricing]
        steepness = 1
        slippage = "exponential"

        [volatility]
        periods_per_year = 8760
        "#,
    )
    .unwrap();

    // Hourly USDC-denominated prices with 6 decimals
    let prices: [u128; 6] = [
        55_284_000_000,
        55_410_500_000,
        55_120_250_000,
        55_600_000_000,
        55_350_750_000,
        55_284_000_000,
    ];

    let mut state = VolatilityState::new(0);
    for (i, raw) in prices.iter().enumerate() {
        let price = from_decimals(*raw, 6).unwrap();
        state = state.observe_price(price, i as u64 * HOUR).unwrap();
    }
    assert_eq!(state.last_observation_time, 5 * HOUR);
    assert!(state.ema_variance.is_positive());

    let variance = state
        .annualized_variance(config.volatility.periods_per_year)
        .unwrap();
    let params = PricingParameters {
        ema_variance_annualized: variance,
        strike: Fixed64x64::from_int(56_000).unwrap(),
        spot: state.last_price.unwrap(),
        time_to_maturity_years: Fixed64x64::divu(7, 365).unwrap(),
        is_call: true,
    };

    let engine = config.pricing.engine().unwrap();
    let pool = CLevelState::new(Fixed64x64::from_int(1_000).unwrap());
    let (breakdown, pool) = engine
        .quote_purchase(
            &params,
            &pool,
            Fixed64x64::from_int(10).unwrap(),
            config.pricing.steepness().unwrap(),
        )
        .unwrap();

    assert!(breakdown.quote.base_cost.is_positive());
    assert!(breakdown.quote.base_cost >= breakdown.model_price);
    assert!(pool.c_level > Fixed64x64::ONE);

    let total = breakdown
        .quote
        .total_cost(Fixed64x64::from_int(10).unwrap())
        .unwrap();
    let cost_usdc = to_decimals(total, 6).unwrap();
    assert!(cost_usdc > 0);
}

#[test]
fn test_repeated_purchases_get_more_expensive() {
    let engine = Config::default().pricing.engine().unwrap();
    let params = PricingParameters {
        ema_variance_annualized: Fixed64x64::from_decimal(dec!(0.64)).unwrap(),
        strike: Fixed64x64::from_int(2_000).unwrap(),
        spot: Fixed64x64::from_int(2_000).unwrap(),
        time_to_maturity_years: Fixed64x64::divu(30, 365).unwrap(),
        is_call: false,
    };
    let size = Fixed64x64::from_int(50).unwrap();

    let mut pool = CLevelState::new(Fixed64x64::from_int(1_000).unwrap());
    let mut last_cost = Fixed64x64::ZERO;
    for _ in 0..5 {
        let (breakdown, next) = engine
            .quote_purchase(&params, &pool, size, Fixed64x64::ONE)
            .unwrap();
        assert!(breakdown.quote.base_cost > last_cost);
        last_cost = breakdown.quote.base_cost;
        pool = next;
    }
}

#[test]
fn test_deposit_after_withdrawal_restores_c_level() {
    let steepness = Fixed64x64::from_decimal(dec!(2.5)).unwrap();
    let pool = CLevelState::new(Fixed64x64::from_int(500).unwrap());
    let drained = pool
        .withdraw(Fixed64x64::from_int(300).unwrap(), steepness)
        .unwrap();
    let refilled = drained
        .deposit(Fixed64x64::from_int(300).unwrap(), steepness)
        .unwrap();
    assert!((refilled.c_level.to_f64() - 1.0).abs() < 1e-15);
}

#[test]
fn test_log_return_feeds_roll() {
    let r = log_return(
        Fixed64x64::from_int(100).unwrap(),
        Fixed64x64::from_int(105).unwrap(),
    )
    .unwrap();
    let state = VolatilityState::new(0).roll(r, 86_400).unwrap();
    let w = 1.0 - (-1.0f64 / 7.0).exp();
    let expected = w * 1.05f64.ln().powi(2);
    assert!((state.ema_variance.to_f64() - expected).abs() < 1e-12);
}
