//! Volatility estimation module
//!
//! Exponentially weighted mean and variance of log returns over unevenly
//! spaced observations. The weight given to a new observation grows with the
//! time elapsed since the previous one.

use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;
use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Decay time constant of the moving averages
pub const WEEK_SECONDS: u64 = 604_800;

/// Weight `1 - exp(-(t1 - t0) / week)` assigned to an observation made at
/// `t1` when the previous one was made at `t0`
pub fn decay_weight(t0: Timestamp, t1: Timestamp) -> MathResult<Fixed64x64> {
    if t1 < t0 {
        return Err(MathError::InvalidInterval { from: t0, to: t1 });
    }
    if t1 == t0 {
        return Ok(Fixed64x64::ZERO);
    }
    let elapsed = Fixed64x64::divu((t1 - t0) as u128, WEEK_SECONDS as u128)?;
    Fixed64x64::ONE.sub(elapsed.neg()?.exp()?)
}

/// Rolling EMA: `r * w + old_ema * (1 - w)`
pub fn rolling_ema(
    old_ema: Fixed64x64,
    log_return: Fixed64x64,
    t0: Timestamp,
    t1: Timestamp,
) -> MathResult<Fixed64x64> {
    let w = decay_weight(t0, t1)?;
    ema_step(old_ema, log_return, w)
}

/// Rolling EMA and EMA-variance.
///
/// The deviation is measured from the previous mean, not the updated one:
/// `var' = var * (1 - w) + w * (r - old_ema)^2`.
pub fn rolling_ema_variance(
    old_ema: Fixed64x64,
    old_variance: Fixed64x64,
    log_return: Fixed64x64,
    t0: Timestamp,
    t1: Timestamp,
) -> MathResult<(Fixed64x64, Fixed64x64)> {
    let w = decay_weight(t0, t1)?;
    if w.is_zero() {
        return Ok((old_ema, old_variance));
    }
    let ema = ema_step(old_ema, log_return, w)?;
    let deviation = log_return.sub(old_ema)?;
    let retained = old_variance.mul(Fixed64x64::ONE.sub(w)?)?;
    let variance = retained.add(w.mul(deviation.mul(deviation)?)?)?;
    Ok((ema, variance))
}

fn ema_step(old_ema: Fixed64x64, log_return: Fixed64x64, w: Fixed64x64) -> MathResult<Fixed64x64> {
    if w.is_zero() {
        return Ok(old_ema);
    }
    log_return
        .mul(w)?
        .add(old_ema.mul(Fixed64x64::ONE.sub(w)?)?)
}

/// `ln(new_price / old_price)`
pub fn log_return(old_price: Fixed64x64, new_price: Fixed64x64) -> MathResult<Fixed64x64> {
    if !old_price.is_positive() || !new_price.is_positive() {
        return Err(MathError::DomainError("prices must be positive"));
    }
    new_price.div(old_price)?.ln()
}

/// Per-pair volatility state owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityState {
    pub ema: Fixed64x64,
    pub ema_variance: Fixed64x64,
    pub last_observation_time: Timestamp,
    /// Last observed price, when observations are fed as prices
    #[serde(default)]
    pub last_price: Option<Fixed64x64>,
}

impl VolatilityState {
    /// Fresh state for a pair created at `created_at`
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            ema: Fixed64x64::ZERO,
            ema_variance: Fixed64x64::ZERO,
            last_observation_time: created_at,
            last_price: None,
        }
    }

    /// Start from a known variance, e.g. a configured prior
    pub fn with_variance(created_at: Timestamp, ema_variance: Fixed64x64) -> Self {
        Self {
            ema_variance,
            ..Self::new(created_at)
        }
    }

    /// Roll the state forward by one log-return observation
    pub fn roll(&self, log_return: Fixed64x64, observation_time: Timestamp) -> MathResult<Self> {
        let (ema, ema_variance) = rolling_ema_variance(
            self.ema,
            self.ema_variance,
            log_return,
            self.last_observation_time,
            observation_time,
        )?;

        tracing::debug!(
            ema = %ema,
            ema_variance = %ema_variance,
            elapsed = observation_time - self.last_observation_time,
            "Rolled volatility state"
        );

        Ok(Self {
            ema,
            ema_variance,
            last_observation_time: observation_time,
            last_price: self.last_price,
        })
    }

    /// Record a price. The first price only seeds the state; every later one
    /// rolls the averages forward by its log return.
    pub fn observe_price(&self, price: Fixed64x64, observation_time: Timestamp) -> MathResult<Self> {
        let next = match self.last_price {
            Some(previous) => self.roll(log_return(previous, price)?, observation_time)?,
            None => {
                if !price.is_positive() {
                    return Err(MathError::DomainError("prices must be positive"));
                }
                if observation_time < self.last_observation_time {
                    return Err(MathError::InvalidInterval {
                        from: self.last_observation_time,
                        to: observation_time,
                    });
                }
                Self {
                    last_observation_time: observation_time,
                    ..*self
                }
            }
        };
        Ok(Self {
            last_price: Some(price),
            ..next
        })
    }

    /// Per-observation variance scaled to a year of `periods_per_year`
    /// observations
    pub fn annualized_variance(&self, periods_per_year: u64) -> MathResult<Fixed64x64> {
        let periods = Fixed64x64::from_uint(periods_per_year as u128)?;
        self.ema_variance.mul(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fx(v: rust_decimal::Decimal) -> Fixed64x64 {
        Fixed64x64::from_decimal(v).unwrap()
    }

    #[test]
    fn test_decay_weight_one_day() {
        let w = decay_weight(1_600_000_000, 1_600_086_400).unwrap();
        assert!((w.to_f64() - 0.1331221002).abs() < 1e-10);
    }

    #[test]
    fn test_decay_weight_zero_interval() {
        assert_eq!(decay_weight(100, 100).unwrap(), Fixed64x64::ZERO);
    }

    #[test]
    fn test_decay_weight_backwards() {
        assert_eq!(
            decay_weight(200, 100),
            Err(MathError::InvalidInterval { from: 200, to: 100 })
        );
    }

    #[test]
    fn test_decay_weight_long_gap() {
        let w = decay_weight(0, 100 * WEEK_SECONDS).unwrap();
        assert!(w.to_f64() > 0.999_999);
        assert!(w <= Fixed64x64::ONE);
    }

    #[test]
    fn test_rolling_ema() {
        let ema = rolling_ema(Fixed64x64::ZERO, fx(dec!(0.1)), 0, 86_400).unwrap();
        assert!((ema.to_f64() - 0.01331221002).abs() < 1e-10);

        let unchanged = rolling_ema(fx(dec!(0.3)), fx(dec!(0.1)), 50, 50).unwrap();
        assert_eq!(unchanged, fx(dec!(0.3)));
    }

    #[test]
    fn test_rolling_ema_variance_uses_old_mean() {
        let old_ema = fx(dec!(0.02));
        let old_var = fx(dec!(0.001));
        let r = fx(dec!(0.05));
        let (ema, var) = rolling_ema_variance(old_ema, old_var, r, 0, 86_400).unwrap();

        let w = 0.1331221002_f64;
        let expected_ema = 0.05 * w + 0.02 * (1.0 - w);
        let expected_var = 0.001 * (1.0 - w) + w * (0.05 - 0.02_f64).powi(2);
        assert!((ema.to_f64() - expected_ema).abs() < 1e-10);
        assert!((var.to_f64() - expected_var).abs() < 1e-10);
    }

    #[test]
    fn test_rolling_ema_variance_zero_interval_is_noop() {
        let (ema, var) =
            rolling_ema_variance(fx(dec!(0.02)), fx(dec!(0.001)), fx(dec!(5)), 10, 10).unwrap();
        assert_eq!(ema, fx(dec!(0.02)));
        assert_eq!(var, fx(dec!(0.001)));
    }

    #[test]
    fn test_log_return() {
        let r = log_return(fx(dec!(100)), fx(dec!(110))).unwrap();
        assert!((r.to_f64() - 1.1_f64.ln()).abs() < 1e-12);
        assert!(matches!(
            log_return(Fixed64x64::ZERO, fx(dec!(1))),
            Err(MathError::DomainError(_))
        ));
    }

    #[test]
    fn test_state_roll() {
        let state = VolatilityState::new(1_000);
        let next = state.roll(fx(dec!(0.01)), 1_000 + 3_600).unwrap();
        assert_eq!(next.last_observation_time, 4_600);
        assert!(next.ema.is_positive());
        assert!(next.ema_variance.is_positive());
        // The input state is untouched
        assert_eq!(state.ema, Fixed64x64::ZERO);
    }

    #[test]
    fn test_state_roll_backwards() {
        let state = VolatilityState::new(1_000);
        assert_eq!(
            state.roll(fx(dec!(0.01)), 999),
            Err(MathError::InvalidInterval { from: 1_000, to: 999 })
        );
    }

    #[test]
    fn test_observe_price_seeds_then_rolls() {
        let state = VolatilityState::new(0);
        let seeded = state.observe_price(fx(dec!(100)), 3_600).unwrap();
        assert_eq!(seeded.ema, Fixed64x64::ZERO);
        assert_eq!(seeded.last_price, Some(fx(dec!(100))));
        assert_eq!(seeded.last_observation_time, 3_600);

        let rolled = seeded.observe_price(fx(dec!(101)), 7_200).unwrap();
        assert!(rolled.ema.is_positive());
        assert_eq!(rolled.last_price, Some(fx(dec!(101))));
    }

    #[test]
    fn test_annualized_variance() {
        let state = VolatilityState::with_variance(0, fx(dec!(0.0001)));
        let annual = state.annualized_variance(8_760).unwrap();
        assert!((annual.to_f64() - 0.876).abs() < 1e-12);
    }
}
