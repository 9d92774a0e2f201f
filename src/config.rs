//! Configuration types for cquote

use crate::error::MathResult;
use crate::fixed::Fixed64x64;
use crate::model::BlackScholesModel;
use crate::quote::{ExponentialSlippage, IdentitySlippage, QuoteEngine, SlippageModel};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub volatility: VolatilityConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Quote engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// How aggressively the C-level reacts to liquidity changes
    #[serde(default = "default_steepness")]
    pub steepness: Decimal,

    /// Minimum annualized return on locked collateral
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_apy: Option<Decimal>,

    /// Trade-size slippage strategy
    #[serde(default)]
    pub slippage: SlippageMode,
}

/// Slippage strategy selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlippageMode {
    #[default]
    Identity,
    Exponential,
}

fn default_steepness() -> Decimal {
    Decimal::ONE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            steepness: default_steepness(),
            min_apy: None,
            slippage: SlippageMode::Identity,
        }
    }
}

impl PricingConfig {
    pub fn steepness(&self) -> MathResult<Fixed64x64> {
        Fixed64x64::from_decimal(self.steepness)
    }

    /// Build the quote engine this section describes
    pub fn engine(&self) -> MathResult<QuoteEngine> {
        let slippage: Box<dyn SlippageModel> = match self.slippage {
            SlippageMode::Identity => Box::new(IdentitySlippage),
            SlippageMode::Exponential => Box::new(ExponentialSlippage),
        };
        let engine = QuoteEngine::new(Box::new(BlackScholesModel::new()), slippage);
        match self.min_apy {
            Some(apy) => Ok(engine.with_min_apy(Fixed64x64::from_decimal(apy)?)),
            None => Ok(engine),
        }
    }
}

/// Volatility estimator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolatilityConfig {
    /// Observations per year used to annualize the EMA variance
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u64,

    /// Variance a new state starts from
    #[serde(default)]
    pub initial_variance: Decimal,
}

fn default_periods_per_year() -> u64 {
    8_760 // hourly observations
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
            initial_variance: Decimal::ZERO,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [pricing]
            steepness = 2.5
            min_apy = 0.05
            slippage = "exponential"

            [volatility]
            periods_per_year = 365
            initial_variance = 0.0004

            [telemetry]
            log_level = "debug"
            log_format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pricing.steepness, dec!(2.5));
        assert_eq!(config.pricing.min_apy, Some(dec!(0.05)));
        assert_eq!(config.pricing.slippage, SlippageMode::Exponential);
        assert_eq!(config.volatility.periods_per_year, 365);
        assert_eq!(config.volatility.initial_variance, dec!(0.0004));
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.pricing.steepness, Decimal::ONE);
        assert!(config.pricing.min_apy.is_none());
        assert_eq!(config.pricing.slippage, SlippageMode::Identity);
        assert_eq!(config.volatility.periods_per_year, 8_760);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let toml = r#"
            [pricing]
            min_apy = 0.1
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pricing.steepness, Decimal::ONE);
        assert_eq!(config.pricing.min_apy, Some(dec!(0.1)));
    }

    #[test]
    fn test_unknown_slippage_mode_rejected() {
        let toml = r#"
            [pricing]
            slippage = "quadratic"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_steepness_conversion() {
        let config = PricingConfig {
            steepness: dec!(0.5),
            ..PricingConfig::default()
        };
        assert_eq!(config.steepness().unwrap(), Fixed64x64::from_raw(1i128 << 63));
    }

    #[test]
    fn test_engine_from_config() {
        let config = PricingConfig {
            min_apy: Some(dec!(0.05)),
            slippage: SlippageMode::Exponential,
            ..PricingConfig::default()
        };
        assert!(config.engine().is_ok());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/cquote.toml");
        assert!(result.is_err());
    }
}
