//! cquote: fixed-point option pricing with liquidity-sensitive quoting
//!
//! This library provides the core components for:
//! - Signed 64.64 fixed-point arithmetic and transcendental functions
//! - Token amount scaling between raw decimals and fixed point
//! - EMA volatility estimation over unevenly spaced observations
//! - Black-Scholes pricing with a rational normal CDF approximation
//! - C-level liquidity multiplier and quote orchestration
//!
//! Every engine operation is a pure function; callers own and persist
//! `VolatilityState` and `CLevelState`.

pub mod cli;
pub mod config;
pub mod error;
pub mod fixed;
pub mod model;
pub mod quote;
pub mod telemetry;
pub mod token;

pub use error::{MathError, MathResult};
pub use fixed::Fixed64x64;
