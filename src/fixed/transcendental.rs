//! Square root, logarithms and exponentials

use super::{narrow, Fixed64x64};
use crate::error::{MathError, MathResult};
use ethnum::{I256, U256};

/// ln(2) scaled by 2^128
const LN_2_Q128: u128 = 0xB17217F7D1CF79ABC9E3B39803F2F6AF;

/// log2(e) scaled by 2^128, minus its leading 2^128 bit
const LOG2_E_Q128_FRACTION: u128 = 0x71547652B82FE1777D0FFDA0D23A7D12;

/// Exponents at or above this bound (64.0) never fit
const EXP_UPPER: i128 = 0x40_0000_0000_0000_0000;

/// `2^(2^-k)` for `k = 1..=64`, scaled by 2^128 with the leading 2^128 bit
/// dropped. Entry `i` applies to fractional bit `63 - i`.
const EXP2_TABLE: [u128; 64] = [
    0x6A09E667F3BCC908B2FB1366EA957D3E,
    0x306FE0A31B7152DE8D5A46305C85EDEC,
    0x172B83C7D517ADCDF7C8C50EB14A7920,
    0x0B5586CF9890F6298B92B71842A98364,
    0x059B0D31585743AE7C548EB68CA417FE,
    0x02C9A3E778060EE6F7CACA4F7A29BDE9,
    0x0163DA9FB33356D84A66AE336DCDFA40,
    0x00B1AFA5ABCBED6129AB13EC11DC9544,
    0x0058C86DA1C09EA1FF19D294CF2F679C,
    0x002C605E2E8CEC506D21BFC89A23A010,
    0x00162F3904051FA128BCA9C55C31E5E0,
    0x000B175EFFDC76BA38E31671CA939726,
    0x00058BA01FB9F96D6CACD4B180917C3E,
    0x0002C5CC37DA9491D0985C348C68E7B3,
    0x000162E525EE054754457D5995292026,
    0x0000B17255775C040618BF4A4ADE83FC,
    0x000058B91B5BC9AE2EED81E9B7D4CFAC,
    0x00002C5C89D5EC6CA4D7C8ACC017B7C9,
    0x0000162E43F4F831060E02D839A9D16D,
    0x00000B1721BCFC99D9F890EA06911763,
    0x0000058B90CF1E6D97F9CA14DBCC1628,
    0x000002C5C863B73F016468F6BAC5CA2C,
    0x00000162E430E5A18F6119E3C02282A5,
    0x000000B1721835514B86E6D96EFD1BFF,
    0x00000058B90C0B48C6BE5DF846C5B2F0,
    0x0000002C5C8601CC6B9E94213C72737A,
    0x000000162E42FFF037DF38AA2B219F06,
    0x0000000B17217FBA9C739AA5819F44F9,
    0x000000058B90BFCDEE5ACD3C1CEDC823,
    0x00000002C5C85FE31F35A6A30DA1BE50,
    0x0000000162E42FF0999CE3541B9FFFCF,
    0x00000000B17217F80F4EF5AADDA45554,
    0x0000000058B90BFBF8479BD5A81B51AD,
    0x000000002C5C85FDF84BD62AE30A74CC,
    0x00000000162E42FEFB2FED257559BDAA,
    0x000000000B17217F7D5A7716BBA4A9AF,
    0x00000000058B90BFBE9DDBAC5E109CCF,
    0x0000000002C5C85FDF4B15DE6F17EB0D,
    0x000000000162E42FEFA494F1478FDE05,
    0x0000000000B17217F7D20CF927C8E94C,
    0x000000000058B90BFBE8F71CB4E4B33E,
    0x00000000002C5C85FDF477B662B26945,
    0x0000000000162E42FEFA3AE53369388C,
    0x00000000000B17217F7D1D351A389D40,
    0x0000000000058B90BFBE8E8B2D3D4EDE,
    0x000000000002C5C85FDF4741BEA6E77F,
    0x00000000000162E42FEFA39FE95583C3,
    0x000000000000B17217F7D1CFB72B45E2,
    0x00000000000058B90BFBE8E7CC35C3F1,
    0x0000000000002C5C85FDF473E242EA38,
    0x000000000000162E42FEFA39F02B772C,
    0x0000000000000B17217F7D1CF7D83C1A,
    0x000000000000058B90BFBE8E7BDCBE2E,
    0x00000000000002C5C85FDF473DEA871F,
    0x0000000000000162E42FEFA39EF44D91,
    0x00000000000000B17217F7D1CF79E949,
    0x0000000000000058B90BFBE8E7BCE544,
    0x000000000000002C5C85FDF473DE6ECA,
    0x00000000000000162E42FEFA39EF366F,
    0x000000000000000B17217F7D1CF79AFA,
    0x00000000000000058B90BFBE8E7BCD6D,
    0x0000000000000002C5C85FDF473DE6B2,
    0x000000000000000162E42FEFA39EF358,
    0x0000000000000000B17217F7D1CF79AC,
];

/// Floor square root of a 256-bit integer via Newton's method
pub(crate) fn sqrt_u256(x: U256) -> u128 {
    if x == U256::ZERO {
        return 0;
    }
    let msb = 255 - x.leading_zeros();
    // Start from a power of two within a factor of two of the root; seven
    // quadratic steps then resolve all 128 result bits.
    let mut r = U256::ONE << (msb / 2);
    for _ in 0..7 {
        r = (r + x / r) >> 1u32;
    }
    let r1 = x / r;
    r.min(r1).as_u128()
}

impl Fixed64x64 {
    /// Square root, rounded down
    pub fn sqrt(self) -> MathResult<Self> {
        if self.0 < 0 {
            return Err(MathError::NegativeRadicand);
        }
        let root = sqrt_u256(U256::new(self.0 as u128) << 64u32);
        Ok(Self(root as i128))
    }

    /// Binary logarithm
    pub fn log_2(self) -> MathResult<Self> {
        if self.0 <= 0 {
            return Err(MathError::DomainError("log_2 of non-positive value"));
        }
        let msb = 127 - self.0.leading_zeros() as i128;
        let mut result = (msb - 64) << 64;

        // Normalise the mantissa to [2^127, 2^128) and square it once per
        // fractional bit; each carry into bit 255 is the next result bit.
        let mut ux = U256::new(self.0 as u128) << (127 - msb) as u32;
        let mut bit: i128 = 1 << 63;
        while bit > 0 {
            ux = ux * ux;
            if ux >= U256::ONE << 255u32 {
                ux = ux >> 128u32;
                result += bit;
            } else {
                ux = ux >> 127u32;
            }
            bit >>= 1;
        }
        Ok(Self(result))
    }

    /// Natural logarithm
    pub fn ln(self) -> MathResult<Self> {
        if self.0 <= 0 {
            return Err(MathError::DomainError("ln of non-positive value"));
        }
        let log2 = self.log_2()?;
        let scaled = (I256::new(log2.0) * U256::new(LN_2_Q128).as_i256()) >> 128u32;
        narrow(scaled).map(Self)
    }

    /// Binary exponent
    pub fn exp_2(self) -> MathResult<Self> {
        if self.0 >= EXP_UPPER {
            return Err(MathError::Overflow);
        }
        if self.0 < -EXP_UPPER {
            return Ok(Self::ZERO);
        }

        // 1.0 at 2^127 scale; every factor is below 2 so it stays under 2^128
        let mut result: u128 = 1 << 127;
        for (i, factor) in EXP2_TABLE.iter().enumerate() {
            if self.0 & (1i128 << (63 - i)) != 0 {
                result += ((U256::new(result) * U256::new(*factor)) >> 128u32).as_u128();
            }
        }

        let shift = 63 - (self.0 >> 64);
        let result = result >> shift as u32;
        if result > i128::MAX as u128 {
            return Err(MathError::Overflow);
        }
        Ok(Self(result as i128))
    }

    /// Natural exponent
    pub fn exp(self) -> MathResult<Self> {
        if self.0 >= EXP_UPPER {
            return Err(MathError::Overflow);
        }
        if self.0 < -EXP_UPPER {
            return Ok(Self::ZERO);
        }
        let log2_e = U256::from_words(1, LOG2_E_Q128_FRACTION).as_i256();
        let scaled = (I256::new(self.0) * log2_e) >> 128u32;
        Self(narrow(scaled)?).exp_2()
    }
}
