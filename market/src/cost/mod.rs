//! Trade-cost engine.
//!
//! Turns one order-book snapshot plus one parameter set into a `CostMetrics`
//! record. The computation is pure: no I/O, no state carried between calls,
//! safe to run concurrently on independent snapshots. The only side effect is
//! timing itself.
//!
//! Preconditions are checked up front and reported as `ImpactError`; nothing
//! is silently defaulted.

pub mod fees;
pub mod impact;
pub mod volatility;

use std::time::Instant;

use serde::Serialize;

use crate::error::{ImpactError, Result};
use crate::types::{OrderBookSnapshot, OrderParameters, PriceLevel};

/// Cost estimate for one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostMetrics {
    /// Expected price deviation as a fraction of notional, in `[0, 0.01]`.
    pub slippage: f64,
    /// Absolute fee amount.
    pub fees: f64,
    /// Model-derived impact fraction, unbounded above.
    pub market_impact: f64,
    /// `quantity * (1 + slippage + market_impact) + fees`
    pub net_cost: f64,
    /// In `[0.5, 0.9]`.
    pub maker_taker_ratio: f64,
    /// Wall-clock time spent computing this record.
    pub latency_seconds: f64,

    pub implied_volatility: f64,
    pub implied_liquidity: f64,
}

impl CostMetrics {
    /// Equality on the modelled values only; latency is a measurement.
    pub fn same_estimate(&self, other: &CostMetrics) -> bool {
        self.slippage == other.slippage
            && self.fees == other.fees
            && self.market_impact == other.market_impact
            && self.net_cost == other.net_cost
            && self.maker_taker_ratio == other.maker_taker_ratio
    }
}

/// Compute trade-cost metrics for `params` against `snapshot`.
///
/// # Errors
/// - `MalformedSnapshot` if either side is empty, a price is not positive,
///   or a size is negative
/// - `InvalidQuantity` if `quantity` is not a positive finite number
/// - `InsufficientLiquidity` if the total book size is zero
///
/// `params.volatility_hint` is not read.
pub fn compute_cost_metrics(
    snapshot: &OrderBookSnapshot,
    params: &OrderParameters,
) -> Result<CostMetrics> {
    validate_snapshot(snapshot)?;

    let quantity = params.quantity;
    if !(quantity.is_finite() && quantity > 0.0) {
        return Err(ImpactError::InvalidQuantity(quantity));
    }

    let started = Instant::now();

    let liquidity = volatility::implied_liquidity(snapshot);
    if liquidity.is_nan() || liquidity <= 0.0 {
        return Err(ImpactError::InsufficientLiquidity(liquidity));
    }

    // Only `None` for an empty bid side, which validation already rejected.
    let sigma = volatility::implied_volatility(snapshot)
        .ok_or_else(|| ImpactError::MalformedSnapshot("bid side is empty".into()))?;

    let slippage = impact::slippage(quantity, liquidity, sigma);
    let fees = fees::fees(quantity, &params.fee_tier);
    let market_impact = impact::market_impact(quantity, liquidity, sigma);
    let net_cost = quantity * (1.0 + slippage + market_impact) + fees;
    let maker_taker_ratio = impact::maker_taker_ratio(market_impact);

    let latency_seconds = started.elapsed().as_secs_f64();

    Ok(CostMetrics {
        slippage,
        fees,
        market_impact,
        net_cost,
        maker_taker_ratio,
        latency_seconds,
        implied_volatility: sigma,
        implied_liquidity: liquidity,
    })
}

fn validate_snapshot(snapshot: &OrderBookSnapshot) -> Result<()> {
    if snapshot.bids.is_empty() {
        return Err(ImpactError::MalformedSnapshot("bid side is empty".into()));
    }
    if snapshot.asks.is_empty() {
        return Err(ImpactError::MalformedSnapshot("ask side is empty".into()));
    }

    let bad = |l: &PriceLevel| l.price.is_sign_negative() || l.price.is_zero() || l.size.is_sign_negative();

    if let Some(l) = snapshot.bids.iter().chain(snapshot.asks.iter()).find(|&l| bad(l)) {
        return Err(ImpactError::MalformedSnapshot(format!(
            "invalid level price={} size={}",
            l.price, l.size
        )));
    }

    Ok(())
}
