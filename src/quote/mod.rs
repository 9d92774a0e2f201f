//! Quote orchestration
//!
//! Combines the C-level update, the option model price and the slippage
//! coefficient into a quoted cost. The caller persists the returned C-level.

mod clevel;
mod slippage;

pub use clevel::{update_c_level, CLevelState};
pub use slippage::{ExponentialSlippage, IdentitySlippage, SlippageModel};

use crate::error::{MathError, MathResult};
use crate::fixed::Fixed64x64;
use crate::model::{intrinsic_value, BlackScholesModel, PricingModel, PricingParameters};
use serde::Serialize;

/// Quoted cost per unit of underlying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub base_cost: Fixed64x64,
    /// Always zero here; fees are applied by the caller
    pub fee_cost: Fixed64x64,
    pub new_c_level: Fixed64x64,
}

impl Quote {
    /// Total cost, base plus fee, of `size` units
    pub fn total_cost(&self, size: Fixed64x64) -> MathResult<Fixed64x64> {
        self.base_cost.add(self.fee_cost)?.mul(size)
    }
}

/// Quote with the intermediate terms that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteBreakdown {
    pub quote: Quote,
    pub model_price: Fixed64x64,
    pub slippage_coefficient: Fixed64x64,
    /// Whether the minimum-APY floor replaced the computed cost
    pub floor_applied: bool,
}

/// Everything needed to price one trade against a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub params: PricingParameters,
    pub old_c_level: Fixed64x64,
    pub old_pool_liquidity: Fixed64x64,
    pub new_pool_liquidity: Fixed64x64,
    pub steepness: Fixed64x64,
}

/// Quote engine: pricing model, slippage strategy and optional cost floor
pub struct QuoteEngine {
    model: Box<dyn PricingModel>,
    slippage: Box<dyn SlippageModel>,
    min_apy: Option<Fixed64x64>,
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new(Box::new(BlackScholesModel::new()), Box::new(IdentitySlippage))
    }
}

impl QuoteEngine {
    pub fn new(model: Box<dyn PricingModel>, slippage: Box<dyn SlippageModel>) -> Self {
        Self {
            model,
            slippage,
            min_apy: None,
        }
    }

    /// Never quote below `intrinsic + collateral * min_apy * T`
    pub fn with_min_apy(mut self, min_apy: Fixed64x64) -> Self {
        self.min_apy = Some(min_apy);
        self
    }

    pub fn quote(&self, request: &QuoteRequest) -> MathResult<QuoteBreakdown> {
        let new_c_level = update_c_level(
            request.old_c_level,
            request.old_pool_liquidity,
            request.new_pool_liquidity,
            request.steepness,
        )?;
        let model_price = self.model.price(&request.params)?;
        let slippage_coefficient = self.slippage.coefficient(
            request.old_pool_liquidity,
            request.new_pool_liquidity,
            request.steepness,
        )?;

        let mut base_cost = new_c_level.mul(model_price)?.mul(slippage_coefficient)?;
        let mut floor_applied = false;
        if let Some(min_apy) = self.min_apy {
            let floor = min_price(&request.params, min_apy)?;
            if floor > base_cost {
                base_cost = floor;
                floor_applied = true;
            }
        }

        tracing::debug!(
            base_cost = %base_cost,
            model_price = %model_price,
            c_level = %new_c_level,
            slippage = %slippage_coefficient,
            floor_applied,
            "Computed quote"
        );

        Ok(QuoteBreakdown {
            quote: Quote {
                base_cost,
                fee_cost: Fixed64x64::ZERO,
                new_c_level,
            },
            model_price,
            slippage_coefficient,
            floor_applied,
        })
    }

    /// Quote a purchase that locks `trade_size` of pool liquidity, returning
    /// the pool state after the trade
    pub fn quote_purchase(
        &self,
        params: &PricingParameters,
        state: &CLevelState,
        trade_size: Fixed64x64,
        steepness: Fixed64x64,
    ) -> MathResult<(QuoteBreakdown, CLevelState)> {
        if trade_size.is_negative() {
            return Err(MathError::DomainError("trade size cannot be negative"));
        }
        if trade_size > state.pool_liquidity {
            return Err(MathError::DomainError("trade size exceeds pool liquidity"));
        }
        let new_pool_liquidity = state.pool_liquidity.sub(trade_size)?;
        let breakdown = self.quote(&QuoteRequest {
            params: *params,
            old_c_level: state.c_level,
            old_pool_liquidity: state.pool_liquidity,
            new_pool_liquidity,
            steepness,
        })?;
        let next = CLevelState {
            c_level: breakdown.quote.new_c_level,
            pool_liquidity: new_pool_liquidity,
        };
        Ok((breakdown, next))
    }
}

fn min_price(params: &PricingParameters, min_apy: Fixed64x64) -> MathResult<Fixed64x64> {
    let intrinsic = intrinsic_value(params.strike, params.spot, params.is_call)?;
    let collateral = if params.is_call { params.spot } else { params.strike };
    intrinsic.add(
        collateral
            .mul(min_apy)?
            .mul(params.time_to_maturity_years)?,
    )
}

/// Quote with Black-Scholes pricing and no slippage adjustment
pub fn quote(
    params: &PricingParameters,
    old_c_level: Fixed64x64,
    old_pool_liquidity: Fixed64x64,
    new_pool_liquidity: Fixed64x64,
    steepness: Fixed64x64,
) -> MathResult<Quote> {
    let request = QuoteRequest {
        params: *params,
        old_c_level,
        old_pool_liquidity,
        new_pool_liquidity,
        steepness,
    };
    QuoteEngine::default().quote(&request).map(|b| b.quote)
}
