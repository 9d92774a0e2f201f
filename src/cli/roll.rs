//! Roll command implementation

use super::{to_fixed, to_report};
use crate::config::Config;
use crate::fixed::Fixed64x64;
use crate::model::VolatilityState;
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct RollArgs {
    /// JSON file holding the volatility state, created if missing
    #[arg(long, default_value = "./volatility.json")]
    pub state: PathBuf,

    /// Observed price
    #[arg(long)]
    pub price: Decimal,

    /// Observation time (RFC 3339), defaults to now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct RollReport {
    ema: Decimal,
    ema_variance: Decimal,
    annualized_variance: Decimal,
    last_observation_time: u64,
}

/// Read a persisted state, or start a new one at `now`
fn load_state(path: &Path, now: u64, initial_variance: Fixed64x64) -> anyhow::Result<VolatilityState> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Creating new volatility state");
        return Ok(VolatilityState::with_variance(now, initial_variance));
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn save_state(path: &Path, state: &VolatilityState) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

impl RollArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let at = self.at.unwrap_or_else(Utc::now);
        let observed = u64::try_from(at.timestamp()).context("observation time before 1970")?;
        let initial_variance = to_fixed(config.volatility.initial_variance, "initial variance")?;

        let state = load_state(&self.state, observed, initial_variance)?;
        let next = state.observe_price(to_fixed(self.price, "price")?, observed)?;
        save_state(&self.state, &next)?;

        let annualized = next.annualized_variance(config.volatility.periods_per_year)?;
        tracing::info!(
            ema_variance = %next.ema_variance,
            annualized_variance = %annualized,
            "Volatility state updated"
        );

        let report = RollReport {
            ema: to_report(next.ema)?,
            ema_variance: to_report(next.ema_variance)?,
            annualized_variance: to_report(annualized)?,
            last_observation_time: next.last_observation_time,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
