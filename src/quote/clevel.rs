//! C-level: liquidity-utilisation price multiplier

use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;
use serde::{Deserialize, Serialize};

/// `old_c * exp(steepness * (old - new) / max(old, new))`
///
/// Withdrawals raise the C-level, deposits lower it. The larger liquidity is
/// always the denominator, so one update moves the C-level by a factor within
/// `[exp(-steepness), exp(steepness)]`, and opposite swings cancel. Negative
/// liquidity or steepness is rejected since either breaks that bound.
pub fn update_c_level(
    old_c_level: Fixed64x64,
    old_pool_liquidity: Fixed64x64,
    new_pool_liquidity: Fixed64x64,
    steepness: Fixed64x64,
) -> MathResult<Fixed64x64> {
    if !old_c_level.is_positive() {
        return Err(MathError::DomainError("C-level must be positive"));
    }
    if old_pool_liquidity.is_negative() || new_pool_liquidity.is_negative() {
        return Err(MathError::DomainError("pool liquidity cannot be negative"));
    }
    if steepness.is_negative() {
        return Err(MathError::DomainError("steepness cannot be negative"));
    }
    let denominator = old_pool_liquidity.max(new_pool_liquidity);
    if !denominator.is_positive() {
        return Err(MathError::DomainError("pool liquidity must be positive"));
    }

    let exponent = old_pool_liquidity
        .sub(new_pool_liquidity)?
        .div(denominator)?
        .mul(steepness)?;
    let c_level = exponent.exp()?.mul(old_c_level)?;

    if !c_level.is_positive() {
        return Err(MathError::DomainError("C-level update underflows to zero"));
    }
    Ok(c_level)
}

/// Per-pair C-level state owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CLevelState {
    pub c_level: Fixed64x64,
    pub pool_liquidity: Fixed64x64,
}

impl CLevelState {
    /// Fresh state with a C-level of 1
    pub fn new(pool_liquidity: Fixed64x64) -> Self {
        Self {
            c_level: Fixed64x64::ONE,
            pool_liquidity,
        }
    }

    /// State after the pool moves to `new_pool_liquidity`
    pub fn apply_liquidity_change(
        &self,
        new_pool_liquidity: Fixed64x64,
        steepness: Fixed64x64,
    ) -> MathResult<Self> {
        let c_level = update_c_level(
            self.c_level,
            self.pool_liquidity,
            new_pool_liquidity,
            steepness,
        )?;

        tracing::debug!(
            old_c_level = %self.c_level,
            c_level = %c_level,
            old_liquidity = %self.pool_liquidity,
            new_liquidity = %new_pool_liquidity,
            "Updated C-level"
        );

        Ok(Self {
            c_level,
            pool_liquidity: new_pool_liquidity,
        })
    }

    pub fn deposit(&self, amount: Fixed64x64, steepness: Fixed64x64) -> MathResult<Self> {
        if amount.is_negative() {
            return Err(MathError::DomainError("deposit amount cannot be negative"));
        }
        self.apply_liquidity_change(self.pool_liquidity.add(amount)?, steepness)
    }

    pub fn withdraw(&self, amount: Fixed64x64, steepness: Fixed64x64) -> MathResult<Self> {
        if amount.is_negative() {
            return Err(MathError::DomainError("withdrawal amount cannot be negative"));
        }
        self.apply_liquidity_change(self.pool_liquidity.sub(amount)?, steepness)
    }
}
