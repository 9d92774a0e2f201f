//! Pricing model module
//!
//! Volatility estimation and closed-form option pricing over 64.64 values

mod black_scholes;
mod volatility;

pub use black_scholes::{bs_price, intrinsic_value, normal_cdf, BlackScholesModel};
pub use volatility::{
    decay_weight, log_return, rolling_ema, rolling_ema_variance, Timestamp, VolatilityState,
    WEEK_SECONDS,
};

use crate::error::MathResult;
use crate::fixed::Fixed64x64;
use serde::{Deserialize, Serialize};

/// Inputs of a single option price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// Annualized variance of log returns
    pub ema_variance_annualized: Fixed64x64,
    pub strike: Fixed64x64,
    pub spot: Fixed64x64,
    /// Time to maturity in years
    pub time_to_maturity_years: Fixed64x64,
    pub is_call: bool,
}

/// Trait for option pricing model implementations
pub trait PricingModel: Send + Sync {
    /// Theoretical price per unit of underlying
    fn price(&self, params: &PricingParameters) -> MathResult<Fixed64x64>;
}
