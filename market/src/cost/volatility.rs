//! Book-derived volatility and liquidity.
//!
//! `implied_volatility` is the root-mean-square deviation of every quoted
//! price from the *first bid price*, not from the mean:
//!
//! ```text
//! sigma = sqrt( sum((p_i - bid_0)^2) / n )
//! ```
//!
//! over bids then asks in snapshot order. It is a book-dispersion heuristic
//! rather than a return-based estimator and must stay exactly this.

use crate::types::OrderBookSnapshot;

/// RMS deviation of all bid and ask prices from the first bid price.
///
/// Returns `None` when the snapshot has no bids (there is no anchor).
pub fn implied_volatility(snapshot: &OrderBookSnapshot) -> Option<f64> {
    let anchor = snapshot.best_bid()?.price_f64();

    let (sum_sq, n) = snapshot
        .bids
        .iter()
        .chain(snapshot.asks.iter())
        .map(|l| l.price_f64() - anchor)
        .fold((0.0_f64, 0_usize), |(acc, n), d| (acc + d * d, n + 1));

    Some((sum_sq / n as f64).sqrt())
}

/// Total resting size on both sides.
pub fn implied_liquidity(snapshot: &OrderBookSnapshot) -> f64 {
    snapshot
        .bids
        .iter()
        .chain(snapshot.asks.iter())
        .map(|l| l.size_f64())
        .sum()
}
