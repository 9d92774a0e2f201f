//! Signed 64.64 fixed-point numbers
//!
//! `Fixed64x64` stores `value * 2^64` in an `i128`. Intermediates that can
//! exceed 128 bits are widened to 256 bits with `ethnum`, and every result is
//! range-checked on the way back down.

mod arith;
mod transcendental;

use crate::error::{MathError, MathResult};
use ethnum::I256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const FRACTION_MASK: i128 = (1i128 << 64) - 1;

/// Signed fixed-point number with 64 integer and 64 fractional bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed64x64(i128);

impl Fixed64x64 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << 64);
    pub const THREE: Self = Self(3 << 64);
    pub const MAX: Self = Self(i128::MAX);
    pub const MIN: Self = Self(i128::MIN);

    /// Wrap raw 64.64 bits
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Raw 64.64 bits
    pub const fn raw(self) -> i128 {
        self.0
    }

    /// Convert a signed integer. Only the `i64` range is accepted.
    pub fn from_int(value: i128) -> MathResult<Self> {
        if value < i64::MIN as i128 || value > i64::MAX as i128 {
            return Err(MathError::Overflow);
        }
        Ok(Self(value << 64))
    }

    /// Integer part, rounded toward negative infinity
    pub fn to_int(self) -> i64 {
        (self.0 >> 64) as i64
    }

    /// Convert an unsigned integer no larger than `2^63 - 1`
    pub fn from_uint(value: u128) -> MathResult<Self> {
        if value > i64::MAX as u128 {
            return Err(MathError::Overflow);
        }
        Ok(Self((value as i128) << 64))
    }

    /// Integer part of a non-negative value
    pub fn to_uint(self) -> MathResult<u64> {
        if self.0 < 0 {
            return Err(MathError::Underflow);
        }
        Ok((self.0 >> 64) as u64)
    }

    /// Convert a decimal, rounding toward negative infinity
    pub fn from_decimal(value: Decimal) -> MathResult<Self> {
        let numerator = I256::new(value.mantissa()) << 64u32;
        let denominator = I256::new(10i128.pow(value.scale()));
        let mut quotient = numerator / denominator;
        if numerator < I256::ZERO && numerator % denominator != I256::ZERO {
            quotient -= I256::ONE;
        }
        narrow(quotient).map(Self)
    }

    /// Convert to a decimal, rounding toward negative infinity.
    ///
    /// Keeps 18 fractional digits while they fit the 96-bit decimal mantissa.
    /// Integer parts above roughly 10^10 leave room for fewer, so the
    /// fraction is cut at the widest scale that still fits.
    pub fn to_decimal(self) -> MathResult<Decimal> {
        let integer = (self.0 >> 64) as i64 as i128;
        let fraction_bits = (self.0 & FRACTION_MASK) as u128;
        for scale in (0..=18u32).rev() {
            let power = 10u128.pow(scale);
            let fraction = ((fraction_bits * power) >> 64) as i128;
            let mantissa = integer * power as i128 + fraction;
            if let Ok(d) = Decimal::try_from_i128_with_scale(mantissa, scale) {
                return Ok(d.normalize());
            }
        }
        Err(MathError::Overflow)
    }

    /// Lossy conversion for reporting and tests
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u128 << 64) as f64
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Fixed64x64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(d) => write!(f, "{}", d),
            Err(_) => write!(f, "{}", self.to_f64()),
        }
    }
}

impl TryFrom<Decimal> for Fixed64x64 {
    type Error = MathError;

    fn try_from(value: Decimal) -> MathResult<Self> {
        Self::from_decimal(value)
    }
}

/// Narrow a 256-bit intermediate back to the 128-bit storage range
pub(crate) fn narrow(value: I256) -> MathResult<i128> {
    if value > I256::new(i128::MAX) || value < I256::new(i128::MIN) {
        return Err(MathError::Overflow);
    }
    Ok(value.as_i128())
}
