//! Linear-plus-square-root market impact heuristic.
//!
//! ```text
//! impact = GAMMA * q / L + ETA * sigma * sqrt(q / L)
//! ```
//!
//! where `q` is the order notional, `L` the total book size and `sigma` the
//! book-implied volatility. The first term is the permanent (linear) part,
//! the second the temporary (square-root) part. Constants are fixed.

/// Permanent impact coefficient.
pub const GAMMA: f64 = 0.1;
/// Temporary impact coefficient.
pub const ETA: f64 = 0.2;

/// Slippage never exceeds 1% of notional.
pub const MAX_SLIPPAGE: f64 = 0.01;

pub const MIN_MAKER_TAKER: f64 = 0.5;
pub const MAX_MAKER_TAKER: f64 = 0.9;

/// Caller guarantees `liquidity > 0`.
pub fn market_impact(quantity: f64, liquidity: f64, volatility: f64) -> f64 {
    let participation = quantity / liquidity;
    GAMMA * participation + ETA * volatility * participation.sqrt()
}

/// `min(MAX_SLIPPAGE, q / L * sigma)`
pub fn slippage(quantity: f64, liquidity: f64, volatility: f64) -> f64 {
    MAX_SLIPPAGE.min((quantity / liquidity) * volatility)
}

/// Share of the order expected to rest as maker flow.
pub fn maker_taker_ratio(impact: f64) -> f64 {
    (1.0 - impact).clamp(MIN_MAKER_TAKER, MAX_MAKER_TAKER)
}
