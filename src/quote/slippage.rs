//! Trade-size slippage coefficients

use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;

/// Scales a quote by the size of the trade relative to pool depth
pub trait SlippageModel: Send + Sync {
    fn coefficient(
        &self,
        old_pool_liquidity: Fixed64x64,
        new_pool_liquidity: Fixed64x64,
        steepness: Fixed64x64,
    ) -> MathResult<Fixed64x64>;
}

/// No size adjustment
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySlippage;

impl SlippageModel for IdentitySlippage {
    fn coefficient(&self, _: Fixed64x64, _: Fixed64x64, _: Fixed64x64) -> MathResult<Fixed64x64> {
        Ok(Fixed64x64::ONE)
    }
}

/// Mean C-level multiplier over the trade: `(1 - exp(-delta)) / delta` with
/// `delta = steepness * (new - old) / old`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialSlippage;

impl SlippageModel for ExponentialSlippage {
    fn coefficient(
        &self,
        old_pool_liquidity: Fixed64x64,
        new_pool_liquidity: Fixed64x64,
        steepness: Fixed64x64,
    ) -> MathResult<Fixed64x64> {
        if !old_pool_liquidity.is_positive() {
            return Err(MathError::DomainError("pool liquidity must be positive"));
        }
        let delta = new_pool_liquidity
            .sub(old_pool_liquidity)?
            .div(old_pool_liquidity)?
            .mul(steepness)?;
        if delta.is_zero() {
            return Ok(Fixed64x64::ONE);
        }
        Fixed64x64::ONE.sub(delta.neg()?.exp()?)?.div(delta)
    }
}
