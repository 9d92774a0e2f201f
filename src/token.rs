//! Token amount scaling
//!
//! Converts raw on-chain integer balances carrying `decimals` digits of
//! precision to and from the 64.64 representation. Both directions round
//! down, so a round trip can lose up to one raw unit.

use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;
use ethnum::U256;
use serde::{Deserialize, Serialize};

/// Decimals used by wei-denominated amounts
pub const WEI_DECIMALS: u8 = 18;

fn scale(decimals: u8) -> MathResult<U256> {
    U256::new(10)
        .checked_pow(decimals as u32)
        .ok_or(MathError::Overflow)
}

/// `raw / 10^decimals` as a 64.64 value, rounded down
pub fn from_decimals(raw: u128, decimals: u8) -> MathResult<Fixed64x64> {
    let quotient = (U256::new(raw) << 64u32) / scale(decimals)?;
    if quotient > U256::new(i128::MAX as u128) {
        return Err(MathError::Overflow);
    }
    Ok(Fixed64x64::from_raw(quotient.as_i128()))
}

/// `value * 10^decimals` as a raw integer, rounded down
pub fn to_decimals(value: Fixed64x64, decimals: u8) -> MathResult<u128> {
    if value.is_negative() {
        return Err(MathError::NegativeInput);
    }
    let product = U256::new(value.raw() as u128)
        .checked_mul(scale(decimals)?)
        .ok_or(MathError::Overflow)?
        >> 64u32;
    if product > U256::new(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(product.as_u128())
}

pub fn from_wei(raw: u128) -> MathResult<Fixed64x64> {
    from_decimals(raw, WEI_DECIMALS)
}

pub fn to_wei(value: Fixed64x64) -> MathResult<u128> {
    to_decimals(value, WEI_DECIMALS)
}

/// Raw token balance paired with its decimal count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub raw: u128,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: u128, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn to_fixed(self) -> MathResult<Fixed64x64> {
        from_decimals(self.raw, self.decimals)
    }

    pub fn from_fixed(value: Fixed64x64, decimals: u8) -> MathResult<Self> {
        Ok(Self {
            raw: to_decimals(value, decimals)?,
            decimals,
        })
    }
}
