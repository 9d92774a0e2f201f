//! CLI interface for cquote
//!
//! Provides subcommands for:
//! - `quote`: Price a purchase against a pool
//! - `price`: Black-Scholes price only
//! - `clevel`: C-level after a liquidity change
//! - `roll`: Roll a persisted volatility state forward
//! - `cdf`: Normal CDF approximation
//! - `config`: Show configuration

mod clevel;
mod price;
mod quote;
mod roll;

pub use clevel::CLevelArgs;
pub use price::{OptionArgs, PriceArgs};
pub use quote::QuoteArgs;
pub use roll::RollArgs;

use crate::fixed::Fixed64x64;
use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "cquote")]
#[command(about = "Fixed-point option pricing with liquidity-sensitive C-level quoting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "cquote.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a purchase against a pool
    Quote(QuoteArgs),
    /// Black-Scholes price only
    Price(PriceArgs),
    /// C-level after a liquidity change
    Clevel(CLevelArgs),
    /// Roll a persisted volatility state forward
    Roll(RollArgs),
    /// Normal CDF approximation
    Cdf {
        /// Point to evaluate
        #[arg(allow_hyphen_values = true)]
        x: Decimal,
    },
    /// Show configuration
    Config,
}

/// Parse a user-supplied decimal into fixed point
pub fn to_fixed(value: Decimal, name: &str) -> anyhow::Result<Fixed64x64> {
    Fixed64x64::from_decimal(value).with_context(|| format!("{name} out of range: {value}"))
}

/// Render a fixed-point result for output
pub(crate) fn to_report(value: Fixed64x64) -> anyhow::Result<Decimal> {
    Ok(value.to_decimal()?)
}
