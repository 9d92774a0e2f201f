//! C-level command implementation

use super::{to_fixed, to_report};
use crate::config::Config;
use crate::quote::update_c_level;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct CLevelArgs {
    /// Pool liquidity before the change
    #[arg(long)]
    pub old: Decimal,

    /// Pool liquidity after the change
    #[arg(long)]
    pub new: Decimal,

    /// C-level before the change
    #[arg(long, default_value = "1")]
    pub c_level: Decimal,

    /// Override the configured steepness
    #[arg(long)]
    pub steepness: Option<Decimal>,
}

impl CLevelArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let steepness = match self.steepness {
            Some(s) => to_fixed(s, "steepness")?,
            None => config.pricing.steepness()?,
        };
        let c_level = update_c_level(
            to_fixed(self.c_level, "C-level")?,
            to_fixed(self.old, "old liquidity")?,
            to_fixed(self.new, "new liquidity")?,
            steepness,
        )?;
        println!("{}", to_report(c_level)?);
        Ok(())
    }
}
