//! Checked arithmetic on 64.64 values

use super::{narrow, Fixed64x64};
use crate::error::{MathError, MathResult};
use ethnum::{I256, U256};

impl Fixed64x64 {
    pub fn add(self, other: Self) -> MathResult<Self> {
        self.0.checked_add(other.0).map(Self).ok_or(MathError::Overflow)
    }

    pub fn sub(self, other: Self) -> MathResult<Self> {
        self.0.checked_sub(other.0).map(Self).ok_or(MathError::Overflow)
    }

    /// Product with a full 256-bit intermediate, rounded toward negative
    /// infinity
    pub fn mul(self, other: Self) -> MathResult<Self> {
        let product = I256::new(self.0) * I256::new(other.0);
        narrow(product >> 64u32).map(Self)
    }

    /// Multiply by a plain integer, returning an integer rounded toward zero
    pub fn muli(self, y: i128) -> MathResult<i128> {
        let product = I256::new(self.0) * I256::new(y);
        let truncated = if product < I256::ZERO {
            -((-product) >> 64u32)
        } else {
            product >> 64u32
        };
        narrow(truncated)
    }

    /// Multiply a non-negative value by an unsigned integer, rounding down
    pub fn mulu(self, y: u128) -> MathResult<u128> {
        if self.0 < 0 {
            return Err(MathError::Underflow);
        }
        let product = (U256::new(self.0 as u128) * U256::new(y)) >> 64u32;
        if product > U256::new(u128::MAX) {
            return Err(MathError::Overflow);
        }
        Ok(product.as_u128())
    }

    /// Quotient truncated toward zero
    pub fn div(self, other: Self) -> MathResult<Self> {
        if other.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        narrow((I256::new(self.0) << 64u32) / I256::new(other.0)).map(Self)
    }

    /// 64.64 quotient of two signed integers
    pub fn divi(x: i128, y: i128) -> MathResult<Self> {
        if y == 0 {
            return Err(MathError::DivisionByZero);
        }
        narrow((I256::new(x) << 64u32) / I256::new(y)).map(Self)
    }

    /// 64.64 quotient of two unsigned integers, rounded down
    pub fn divu(x: u128, y: u128) -> MathResult<Self> {
        if y == 0 {
            return Err(MathError::DivisionByZero);
        }
        let quotient = (U256::new(x) << 64u32) / U256::new(y);
        if quotient > U256::new(i128::MAX as u128) {
            return Err(MathError::Overflow);
        }
        Ok(Self(quotient.as_i128()))
    }

    pub fn neg(self) -> MathResult<Self> {
        self.0.checked_neg().map(Self).ok_or(MathError::Overflow)
    }

    pub fn abs(self) -> MathResult<Self> {
        self.0.checked_abs().map(Self).ok_or(MathError::Overflow)
    }

    /// Reciprocal, truncated toward zero
    pub fn inv(self) -> MathResult<Self> {
        if self.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        narrow((I256::ONE << 128u32) / I256::new(self.0)).map(Self)
    }

    /// Arithmetic mean, rounded toward negative infinity. Never overflows.
    pub fn avg(self, other: Self) -> Self {
        Self(((I256::new(self.0) + I256::new(other.0)) >> 1u32).as_i128())
    }

    /// Geometric mean `sqrt(x * y)`
    pub fn gavg(self, other: Self) -> MathResult<Self> {
        let product = I256::new(self.0) * I256::new(other.0);
        if product < I256::ZERO {
            return Err(MathError::NegativeRadicand);
        }
        let root = super::transcendental::sqrt_u256(product.as_u256());
        if root > i128::MAX as u128 {
            return Err(MathError::Overflow);
        }
        Ok(Self(root as i128))
    }

    /// Integer power by repeated squaring
    pub fn pow(self, mut n: u32) -> MathResult<Self> {
        let mut result = Self::ONE;
        let mut base = self;
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(base)?;
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(base)?;
            }
        }
        Ok(result)
    }
}
