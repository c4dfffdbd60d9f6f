//! Local L2 book.
//!
//! Keeps the full price ladder for one instrument, keyed by exact decimal
//! price. A `Snapshot` message replaces both sides; an `Update` merges
//! levels, where a zero size removes the level. After a delta the cost engine
//! is handed a best-first [`OrderBookSnapshot`] cut from the top of this ladder.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::feed::{BookAction, BookMessage};
use crate::types::{OrderBookSnapshot, PriceLevel, Side};

pub const DEFAULT_BOOK_DEPTH: usize = 10;

#[derive(Debug, Default)]
pub struct LocalBook {
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
    last_update_ms: Option<u64>,
}

impl LocalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one decoded book message received at `ts_ms`.
    pub fn apply(&mut self, msg: &BookMessage, ts_ms: u64) {
        if msg.action == BookAction::Snapshot {
            self.bids.clear();
            self.asks.clear();
        }

        Self::merge(&mut self.bids, &msg.bids);
        Self::merge(&mut self.asks, &msg.asks);
        self.last_update_ms = Some(ts_ms);
    }

    fn merge(side: &mut BTreeMap<Decimal, Decimal>, levels: &[PriceLevel]) {
        for lvl in levels {
            if lvl.size.is_zero() {
                side.remove(&lvl.price);
            } else {
                side.insert(lvl.price, lvl.size);
            }
        }
    }

    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids
            .iter()
            .next_back()
            .map(|(price, size)| PriceLevel::new(*price, *size))
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks
            .iter()
            .next()
            .map(|(price, size)| PriceLevel::new(*price, *size))
    }

    /// Best `n` levels of `side`, best first.
    pub fn top_n(&self, side: Side, n: usize) -> Vec<PriceLevel> {
        let to_level = |(price, size): (&Decimal, &Decimal)| PriceLevel::new(*price, *size);
        match side {
            Side::Bid => self.bids.iter().rev().take(n).map(to_level).collect(),
            Side::Ask => self.asks.iter().take(n).map(to_level).collect(),
        }
    }

    /// Best-first view of the top `depth` levels per side.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot::new(self.top_n(Side::Bid, depth), self.top_n(Side::Ask, depth))
    }

    /// Total size resting in the best `depth` levels of `side`.
    pub fn depth_volume(&self, side: Side, depth: usize) -> Decimal {
        self.top_n(side, depth).iter().map(|l| l.size).sum()
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.last_update_ms = None;
    }
}
