//! Quote command implementation

use super::{to_fixed, to_report, OptionArgs};
use crate::config::Config;
use crate::quote::CLevelState;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub option: OptionArgs,

    /// Current C-level of the pool
    #[arg(long, default_value = "1")]
    pub c_level: Decimal,

    /// Free liquidity in the pool before the trade
    #[arg(long)]
    pub liquidity: Decimal,

    /// Contracts purchased
    #[arg(long)]
    pub trade_size: Decimal,

    /// Override the configured steepness
    #[arg(long)]
    pub steepness: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    base_cost: Decimal,
    fee_cost: Decimal,
    total_cost: Decimal,
    model_price: Decimal,
    slippage_coefficient: Decimal,
    floor_applied: bool,
    new_c_level: Decimal,
    new_liquidity: Decimal,
}

impl QuoteArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let params = self.option.to_params()?;
        let steepness = match self.steepness {
            Some(s) => to_fixed(s, "steepness")?,
            None => config.pricing.steepness()?,
        };
        let state = CLevelState {
            c_level: to_fixed(self.c_level, "C-level")?,
            pool_liquidity: to_fixed(self.liquidity, "liquidity")?,
        };
        let size = to_fixed(self.trade_size, "trade size")?;

        let engine = config.pricing.engine()?;
        let (breakdown, next) = engine.quote_purchase(&params, &state, size, steepness)?;
        tracing::info!(
            base_cost = %breakdown.quote.base_cost,
            c_level = %next.c_level,
            "Quoted purchase"
        );

        let report = QuoteReport {
            base_cost: to_report(breakdown.quote.base_cost)?,
            fee_cost: to_report(breakdown.quote.fee_cost)?,
            total_cost: to_report(breakdown.quote.total_cost(size)?)?,
            model_price: to_report(breakdown.model_price)?,
            slippage_coefficient: to_report(breakdown.slippage_coefficient)?,
            floor_applied: breakdown.floor_applied,
            new_c_level: to_report(next.c_level)?,
            new_liquidity: to_report(next.pool_liquidity)?,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
