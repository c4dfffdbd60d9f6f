use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Book side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

/// One aggregated price level of an L2 book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    pub fn price_f64(&self) -> f64 {
        self.price.to_f64().unwrap_or(f64::NAN)
    }

    pub fn size_f64(&self) -> f64 {
        self.size.to_f64().unwrap_or(f64::NAN)
    }
}

/// Depth-of-market view handed to the cost engine.
///
/// Both sides are best-first: index 0 of `bids` is the highest bid and
/// index 0 of `asks` the lowest ask. Nothing else about ordering is assumed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn is_two_sided(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty()
    }
}

/// Exchange fee schedule selected by the user.
///
/// Any tier label outside the known set is kept as `Unrecognized` and billed
/// at the Tier1 rate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeeTier {
    #[default]
    Tier1,
    Tier2,
    Tier3,
    Unrecognized(String),
}

impl FeeTier {
    pub fn as_str(&self) -> &str {
        match self {
            FeeTier::Tier1 => "Tier1",
            FeeTier::Tier2 => "Tier2",
            FeeTier::Tier3 => "Tier3",
            FeeTier::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for FeeTier {
    fn from(label: &str) -> Self {
        match label {
            "Tier1" => FeeTier::Tier1,
            "Tier2" => FeeTier::Tier2,
            "Tier3" => FeeTier::Tier3,
            other => FeeTier::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for FeeTier {
    fn from(label: String) -> Self {
        FeeTier::from(label.as_str())
    }
}

impl From<FeeTier> for String {
    fn from(tier: FeeTier) -> Self {
        tier.as_str().to_string()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hypothetical order the user wants costed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderParameters {
    /// Notional size of the order (USD).
    pub quantity: f64,

    pub fee_tier: FeeTier,

    /// Caller-supplied volatility.
    ///
    /// Currently inert: the engine derives its own volatility from the book
    /// and never reads this value.
    pub volatility_hint: f64,

    // Descriptive only.
    pub exchange: String,
    pub asset: String,
    pub order_type: String,
}

impl OrderParameters {
    pub fn new(quantity: f64, fee_tier: FeeTier) -> Self {
        Self {
            quantity,
            fee_tier,
            ..Self::default()
        }
    }
}

impl Default for OrderParameters {
    fn default() -> Self {
        Self {
            quantity: 100.0,
            fee_tier: FeeTier::Tier1,
            volatility_hint: 0.02,
            exchange: "OKX".into(),
            asset: "BTC-USDT".into(),
            order_type: "market".into(),
        }
    }
}

/// Top-of-book figures shown next to the cost metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub best_bid: Decimal,
    pub best_ask: Decimal,
    /// best_ask - best_bid
    pub spread: Decimal,
    /// Sum of all bid sizes in the snapshot.
    pub bid_volume: Decimal,
}

impl MarketSummary {
    /// Returns `None` for a one-sided book.
    pub fn from_snapshot(snapshot: &OrderBookSnapshot) -> Option<Self> {
        let best_bid = snapshot.best_bid()?.price;
        let best_ask = snapshot.best_ask()?.price;

        Some(Self {
            best_bid,
            best_ask,
            spread: best_ask - best_bid,
            bid_volume: snapshot.bids.iter().map(|l| l.size).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lvl(price: i64, size: i64) -> PriceLevel {
        PriceLevel::new(Decimal::from(price), Decimal::from(size))
    }

    #[test]
    fn fee_tier_parses_known_labels() {
        assert_eq!(FeeTier::from("Tier1"), FeeTier::Tier1);
        assert_eq!(FeeTier::from("Tier2"), FeeTier::Tier2);
        assert_eq!(FeeTier::from("Tier3"), FeeTier::Tier3);
    }

    #[test]
    fn fee_tier_keeps_unknown_label() {
        let tier = FeeTier::from("VIP9");
        assert_eq!(tier, FeeTier::Unrecognized("VIP9".into()));
        assert_eq!(tier.to_string(), "VIP9");
    }

    #[test]
    fn fee_tier_serde_uses_plain_strings() {
        let json = serde_json::to_string(&FeeTier::Tier2).unwrap();
        assert_eq!(json, "\"Tier2\"");

        let tier: FeeTier = serde_json::from_str("\"Gold\"").unwrap();
        assert_eq!(tier, FeeTier::Unrecognized("Gold".into()));
    }

    #[test]
    fn summary_uses_top_of_book() {
        let snap = OrderBookSnapshot::new(vec![lvl(100, 1), lvl(99, 2)], vec![lvl(101, 3)]);
        let s = MarketSummary::from_snapshot(&snap).unwrap();

        assert_eq!(s.best_bid, Decimal::from(100));
        assert_eq!(s.best_ask, Decimal::from(101));
        assert_eq!(s.spread, Decimal::from(1));
        assert_eq!(s.bid_volume, Decimal::from(3));
    }

    #[test]
    fn summary_requires_both_sides() {
        let snap = OrderBookSnapshot::new(vec![], vec![lvl(101, 3)]);
        assert!(MarketSummary::from_snapshot(&snap).is_none());
        assert!(!snap.is_two_sided());
    }

    #[test]
    fn default_parameters_match_dashboard_defaults() {
        let p = OrderParameters::default();
        assert_eq!(p.quantity, 100.0);
        assert_eq!(p.fee_tier, FeeTier::Tier1);
        assert_eq!(p.exchange, "OKX");
    }
}
