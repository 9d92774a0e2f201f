//! Black-Scholes European option pricer
//!
//! Uses a rational approximation of the standard normal CDF,
//! N(x) = 1 - phi(x) / (0.226 + 0.64 x + 0.33 sqrt(x^2 + 3)) for x >= 0,
//! which only needs `exp` and `sqrt` in fixed point.

use super::{PricingModel, PricingParameters};
use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;

/// 1 / sqrt(2 pi)
const INV_SQRT_2PI: Fixed64x64 = Fixed64x64::from_raw(0x6621_14CF_50D9_4234);
/// 0.226
const CDF_CONST_0: Fixed64x64 = Fixed64x64::from_raw(0x39DB_22D0_E560_4189);
/// 0.64
const CDF_CONST_1: Fixed64x64 = Fixed64x64::from_raw(0xA3D7_0A3D_70A3_D70A);
/// 0.33
const CDF_CONST_2: Fixed64x64 = Fixed64x64::from_raw(0x547A_E147_AE14_7AE1);

/// Beyond this point `exp(-x^2 / 2)` is below one ulp
const TAIL_CUTOFF: Fixed64x64 = Fixed64x64::from_raw(64 << 64);

/// Upper tail `1 - N(x)` for `x >= 0`
fn upper_tail(x: Fixed64x64) -> MathResult<Fixed64x64> {
    if x >= TAIL_CUTOFF {
        return Ok(Fixed64x64::ZERO);
    }
    let x2 = x.mul(x)?;
    let density = INV_SQRT_2PI.mul(Fixed64x64::from_raw(-(x2.raw() >> 1)).exp()?)?;
    let denominator = CDF_CONST_0
        .add(CDF_CONST_1.mul(x)?)?
        .add(CDF_CONST_2.mul(Fixed64x64::THREE.add(x2)?.sqrt()?)?)?;
    density.div(denominator)
}

/// Approximate standard normal CDF. `N(x) + N(-x) == 1` exactly for any
/// non-zero `x`.
pub fn normal_cdf(x: Fixed64x64) -> MathResult<Fixed64x64> {
    if x.is_negative() {
        Fixed64x64::ONE.sub(normal_cdf(x.neg()?)?)
    } else {
        Fixed64x64::ONE.sub(upper_tail(x)?)
    }
}

/// Theoretical price of a European option
pub fn bs_price(
    variance_annualized: Fixed64x64,
    strike: Fixed64x64,
    spot: Fixed64x64,
    time_to_maturity_years: Fixed64x64,
    is_call: bool,
) -> MathResult<Fixed64x64> {
    if !spot.is_positive() {
        return Err(MathError::DomainError("spot must be positive"));
    }
    if !strike.is_positive() {
        return Err(MathError::DomainError("strike must be positive"));
    }
    if !time_to_maturity_years.is_positive() {
        return Err(MathError::DomainError("time to maturity must be positive"));
    }
    if !variance_annualized.is_positive() {
        return Err(MathError::DomainError("variance must be positive"));
    }

    let cum_variance = variance_annualized.mul(time_to_maturity_years)?;
    let cum_variance_sqrt = cum_variance.sqrt()?;
    if cum_variance_sqrt.is_zero() {
        return Err(MathError::DomainError("cumulative variance underflows to zero"));
    }

    let d1 = spot
        .div(strike)?
        .ln()?
        .add(Fixed64x64::from_raw(cum_variance.raw() >> 1))?
        .div(cum_variance_sqrt)?;
    let d2 = d1.sub(cum_variance_sqrt)?;

    if is_call {
        spot.mul(normal_cdf(d1)?)?
            .sub(strike.mul(normal_cdf(d2)?)?)
    } else {
        strike
            .mul(normal_cdf(d2.neg()?)?)?
            .sub(spot.mul(normal_cdf(d1.neg()?)?)?)
    }
}

/// Value of exercising immediately, zero when out of the money
pub fn intrinsic_value(strike: Fixed64x64, spot: Fixed64x64, is_call: bool) -> MathResult<Fixed64x64> {
    let value = if is_call { spot.sub(strike)? } else { strike.sub(spot)? };
    Ok(value.max(Fixed64x64::ZERO))
}

/// Closed-form Black-Scholes model
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesModel;

impl BlackScholesModel {
    pub fn new() -> Self {
        Self
    }
}

impl PricingModel for BlackScholesModel {
    fn price(&self, params: &PricingParameters) -> MathResult<Fixed64x64> {
        bs_price(
            params.ema_variance_annualized,
            params.strike,
            params.spot,
            params.time_to_maturity_years,
            params.is_call,
        )
    }
}
