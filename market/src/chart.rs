//! Tick buffer feeding the cost time-series chart.
//!
//! Holds the most recent `capacity` chart points (50 by default) in arrival
//! order. Points are never re-sorted; `timestamp_ms` is informational.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::cost::CostMetrics;
use crate::rolling_window::RollingWindow;
use crate::time::time_label;

pub const DEFAULT_CHART_CAPACITY: usize = 50;

/// One plotted tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Local ingestion time, `HH:MM:SS`.
    pub time_label: String,
    pub net_cost: f64,
    pub slippage: f64,
    pub market_impact: f64,
    /// Ingestion time, ms since epoch.
    pub timestamp_ms: u64,
}

impl ChartPoint {
    pub fn from_metrics(metrics: &CostMetrics, at: DateTime<Local>) -> Self {
        Self {
            time_label: time_label(&at),
            net_cost: metrics.net_cost,
            slippage: metrics.slippage,
            market_impact: metrics.market_impact,
            timestamp_ms: at.timestamp_millis() as u64,
        }
    }
}

pub struct TickBuffer {
    points: RollingWindow<ChartPoint>,
}

impl Default for TickBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_CAPACITY)
    }
}

impl TickBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: RollingWindow::new(capacity),
        }
    }

    /// Record `metrics` as of now and return the retained sequence.
    pub fn append(&mut self, metrics: &CostMetrics) -> Vec<ChartPoint> {
        self.append_at(metrics, Local::now())
    }

    /// Same as [`append`](Self::append) with an explicit ingestion time.
    pub fn append_at(&mut self, metrics: &CostMetrics, at: DateTime<Local>) -> Vec<ChartPoint> {
        self.points.push(ChartPoint::from_metrics(metrics, at));
        self.points.to_vec()
    }

    pub fn current(&self) -> Vec<ChartPoint> {
        self.points.to_vec()
    }

    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.latest()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    /// Drop all points. Called at a session boundary.
    pub fn reset(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn metrics(net_cost: f64) -> CostMetrics {
        CostMetrics {
            slippage: 0.01,
            fees: 0.1,
            market_impact: 0.5,
            net_cost,
            maker_taker_ratio: 0.5,
            latency_seconds: 0.0,
            implied_volatility: 1.0,
            implied_liquidity: 10.0,
        }
    }

    #[test]
    fn keeps_last_fifty_in_arrival_order() {
        let mut buf = TickBuffer::default();

        let mut out = Vec::new();
        for i in 1..=60 {
            out = buf.append(&metrics(i as f64));
        }

        assert_eq!(out.len(), 50);
        assert_eq!(buf.len(), 50);

        let costs: Vec<f64> = out.iter().map(|p| p.net_cost).collect();
        let expected: Vec<f64> = (11..=60).map(|i| i as f64).collect();
        assert_eq!(costs, expected);
        assert_eq!(buf.current(), out);
    }

    #[test]
    fn reset_then_append_has_one_point() {
        let mut buf = TickBuffer::default();
        for i in 0..5 {
            buf.append(&metrics(i as f64));
        }

        buf.reset();
        assert!(buf.is_empty());

        let out = buf.append(&metrics(7.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].net_cost, 7.0);
    }

    #[test]
    fn point_copies_metrics_and_time() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 15, 42).unwrap();
        let mut buf = TickBuffer::new(3);

        let out = buf.append_at(&metrics(410.64), at);
        let p = &out[0];

        assert_eq!(p.time_label, "09:15:42");
        assert_eq!(p.net_cost, 410.64);
        assert_eq!(p.slippage, 0.01);
        assert_eq!(p.market_impact, 0.5);
        assert_eq!(p.timestamp_ms, at.timestamp_millis() as u64);
    }

    #[test]
    fn current_does_not_mutate() {
        let mut buf = TickBuffer::new(2);
        buf.append(&metrics(1.0));

        let a = buf.current();
        let b = buf.current();
        assert_eq!(a, b);
        assert_eq!(buf.len(), 1);
    }
}
