//! Property-based tests for engine invariants

use cquote::MathError;
use cquote::fixed::Fixed64x64;
use cquote::model::{bs_price, decay_weight, normal_cdf};
use cquote::quote::update_c_level;
use cquote::token::{from_decimals, to_decimals};
use proptest::prelude::*;

fn fixed(units: u64, millis: u64) -> Fixed64x64 {
    Fixed64x64::from_int(units as i128)
        .unwrap()
        .add(Fixed64x64::divu(millis as u128, 1_000).unwrap())
        .unwrap()
}

proptest! {
    #[test]
    fn prop_decimal_round_trip_within_one_unit(
        whole in 0u128..(1u128 << 60),
        fraction in any::<u64>(),
        decimals in 0u8..=18,
    ) {
        let scale = 10u128.pow(decimals as u32);
        let raw = whole * scale + fraction as u128 % scale;
        let fixed = from_decimals(raw, decimals).unwrap();
        let back = to_decimals(fixed, decimals).unwrap();
        prop_assert!(back <= raw);
        prop_assert!(raw - back <= 1);
    }

    #[test]
    fn prop_decay_weight_monotonic(
        t0 in 0u64..2_000_000_000,
        gap in 1u64..10_000_000,
        extra in 1u64..1_000_000,
    ) {
        let near = decay_weight(t0, t0 + gap).unwrap();
        let far = decay_weight(t0, t0 + gap + extra).unwrap();
        prop_assert!(near.is_positive());
        prop_assert!(far > near);
        prop_assert!(far <= Fixed64x64::ONE);
        prop_assert_eq!(decay_weight(t0, t0).unwrap(), Fixed64x64::ZERO);
    }

    #[test]
    fn prop_c_level_reciprocity(
        a in 1u64..1_000_000,
        b in 1u64..1_000_000,
        s_millis in 1u64..5_000,
    ) {
        let a = Fixed64x64::from_int(a as i128).unwrap();
        let b = Fixed64x64::from_int(b as i128).unwrap();
        let s = Fixed64x64::divu(s_millis as u128, 1_000).unwrap();
        let up = update_c_level(Fixed64x64::ONE, a, b, s).unwrap();
        let down = update_c_level(Fixed64x64::ONE, b, a, s).unwrap();
        let product = up.mul(down).unwrap().to_f64();
        prop_assert!((product - 1.0).abs() < 1e-12, "product {}", product);
    }

    #[test]
    fn prop_c_level_factor_bounded(
        a in 1u64..1_000_000,
        b in 0u64..1_000_000,
        s_millis in 1u64..5_000,
    ) {
        let s = s_millis as f64 / 1_000.0;
        let old = Fixed64x64::from_int(a as i128).unwrap();
        let new = Fixed64x64::from_int(b as i128).unwrap();
        let steepness = Fixed64x64::divu(s_millis as u128, 1_000).unwrap();

        let c = update_c_level(Fixed64x64::ONE, old, new, steepness)
            .unwrap()
            .to_f64();
        prop_assert!(c <= s.exp() * (1.0 + 1e-12));
        prop_assert!(c >= (-s).exp() * (1.0 - 1e-12));

        // Inputs that could push the factor outside the bound are rejected
        let below_zero = Fixed64x64::from_int(-(b as i128) - 1).unwrap();
        prop_assert!(matches!(
            update_c_level(Fixed64x64::ONE, old, below_zero, steepness),
            Err(MathError::DomainError(_))
        ));
        prop_assert!(matches!(
            update_c_level(Fixed64x64::ONE, old, new, steepness.neg().unwrap()),
            Err(MathError::DomainError(_))
        ));
    }

    #[test]
    fn prop_cdf_symmetry(raw in 1i128..(40i128 << 64)) {
        let x = Fixed64x64::from_raw(raw);
        let sum = normal_cdf(x).unwrap().add(normal_cdf(x.neg().unwrap()).unwrap()).unwrap();
        prop_assert_eq!(sum, Fixed64x64::ONE);
    }

    #[test]
    fn prop_cdf_monotonic_and_bounded(units in 0u64..8, millis in 0u64..1_000) {
        let x = fixed(units, millis);
        let step = Fixed64x64::divu(1, 100).unwrap();
        let lo = normal_cdf(x).unwrap();
        let hi = normal_cdf(x.add(step).unwrap()).unwrap();
        prop_assert!(hi >= lo);
        prop_assert!(lo >= Fixed64x64::ZERO && hi <= Fixed64x64::ONE);
    }

    #[test]
    fn prop_put_call_parity(
        spot in 50u64..5_000,
        strike in 50u64..5_000,
        var_millis in 10u64..2_000,
        days in 1u128..730,
    ) {
        let spot_f = Fixed64x64::from_int(spot as i128).unwrap();
        let strike_f = Fixed64x64::from_int(strike as i128).unwrap();
        let variance = Fixed64x64::divu(var_millis as u128, 1_000).unwrap();
        let t = Fixed64x64::divu(days, 365).unwrap();

        let call = bs_price(variance, strike_f, spot_f, t, true).unwrap();
        let put = bs_price(variance, strike_f, spot_f, t, false).unwrap();
        let parity = call.sub(put).unwrap().to_f64();
        let expected = spot as f64 - strike as f64;
        prop_assert!((parity - expected).abs() < 1e-9, "parity {} expected {}", parity, expected);
    }
}
