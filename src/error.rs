//! Error taxonomy shared by every engine component

use thiserror::Error;

/// Failure of a single engine computation.
///
/// Every variant is terminal for the call that produced it. Nothing in the
/// engine clamps or saturates, so an overflow always surfaces here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// Result exceeds the representable range
    #[error("Arithmetic overflow")]
    Overflow,
    /// Result below the representable range of an unsigned target
    #[error("Arithmetic underflow")]
    Underflow,
    /// Divisor was zero
    #[error("Division by zero")]
    DivisionByZero,
    /// Input outside the domain of the function
    #[error("Domain error: {0}")]
    DomainError(&'static str),
    /// Square root of a negative value
    #[error("Negative radicand")]
    NegativeRadicand,
    /// Observation interval runs backwards in time
    #[error("Invalid interval: {to} precedes {from}")]
    InvalidInterval { from: u64, to: u64 },
    /// Token amounts are never negative
    #[error("Negative input")]
    NegativeInput,
}

/// Result alias used throughout the engine
pub type MathResult<T> = Result<T, MathError>;
