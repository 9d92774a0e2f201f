//! Price command implementation

use super::{to_fixed, to_report};
use crate::fixed::Fixed64x64;
use crate::model::{BlackScholesModel, PricingModel, PricingParameters};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

/// Option contract inputs shared by `price` and `quote`
#[derive(Args, Debug, Clone)]
pub struct OptionArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: Decimal,

    /// Strike price
    #[arg(long)]
    pub strike: Decimal,

    /// Annualized variance of log returns
    #[arg(long)]
    pub variance: Decimal,

    /// Days until maturity
    #[arg(long)]
    pub maturity_days: Decimal,

    /// Price a put instead of a call
    #[arg(long)]
    pub put: bool,
}

impl OptionArgs {
    pub fn to_params(&self) -> anyhow::Result<PricingParameters> {
        let days = to_fixed(self.maturity_days, "maturity")?;
        Ok(PricingParameters {
            ema_variance_annualized: to_fixed(self.variance, "variance")?,
            strike: to_fixed(self.strike, "strike")?,
            spot: to_fixed(self.spot, "spot")?,
            time_to_maturity_years: days.div(Fixed64x64::from_int(365)?)?,
            is_call: !self.put,
        })
    }
}

#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub option: OptionArgs,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    price: Decimal,
    is_call: bool,
}

impl PriceArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        let params = self.option.to_params()?;
        let price = BlackScholesModel::new().price(&params)?;
        tracing::info!(price = %price, is_call = params.is_call, "Priced option");

        let report = PriceReport {
            price: to_report(price)?,
            is_call: params.is_call,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
