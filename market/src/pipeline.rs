//! Metrics pipeline.
//!
//! Single consumer of the feed channel. Each event is handled to completion,
//! including the tick-buffer append, before the next one is read, so buffer
//! order is arrival order.
//!
//! Per book message:
//!   • merge into the local book
//!   • pick the engine input: a `Snapshot` message is handed over as
//!     delivered (every level, message order); an `Update` delta is resolved
//!     against the local book and cut best-first to `book_depth`
//!   • run the cost engine with the current parameters
//!   • on success append a chart point, record latency and broadcast a
//!     `TickReport`
//!   • on engine error log and skip the tick (buffer untouched)
//!
//! A `FeedEvent::Connected` marks a new session: local book, latency history
//! and tick buffer are cleared.

use std::sync::Arc;
use std::time::Duration;

use common::logger::warn_if_slow;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{
    mpsc::{Receiver, Sender},
    watch,
};
use tracing::{debug, info, instrument, warn};

use crate::book::{DEFAULT_BOOK_DEPTH, LocalBook};
use crate::chart::{ChartPoint, DEFAULT_CHART_CAPACITY, TickBuffer};
use crate::cost::{CostMetrics, compute_cost_metrics};
use crate::feed::{BookAction, BookMessage, FeedEvent};
use crate::latency::{LatencyStats, LatencyTracker};
use crate::time::now_ms;
use crate::types::{MarketSummary, OrderBookSnapshot, OrderParameters};

/// Everything the presentation layer needs for one processed tick.
#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub ts_ms: u64,
    pub summary: MarketSummary,
    pub metrics: CostMetrics,
    pub chart: Vec<ChartPoint>,
    pub latency: Option<LatencyStats>,
}

#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// Levels per side cut from the local book after an `Update` delta.
    /// Full snapshots always reach the engine unabridged.
    pub book_depth: usize,
    pub chart_capacity: usize,
    /// Ticks slower than this are reported on the `performance` target.
    pub slow_tick: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            book_depth: DEFAULT_BOOK_DEPTH,
            chart_capacity: DEFAULT_CHART_CAPACITY,
            slow_tick: Duration::from_millis(5),
        }
    }
}

/// Read-only handle on the tick buffer for chart renderers.
#[derive(Clone)]
pub struct ChartHandle {
    inner: Arc<RwLock<TickBuffer>>,
}

impl ChartHandle {
    pub fn current(&self) -> Vec<ChartPoint> {
        self.inner.read().current()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

pub struct MetricsPipeline {
    config: PipelineConfig,
    params: watch::Receiver<OrderParameters>,
    book: LocalBook,
    latency: LatencyTracker,
    /// Written only by this pipeline.
    chart: Arc<RwLock<TickBuffer>>,
    subscribers: Vec<Sender<TickReport>>,
}

impl MetricsPipeline {
    pub fn new(config: PipelineConfig, params: watch::Receiver<OrderParameters>) -> Self {
        Self {
            config,
            params,
            book: LocalBook::new(),
            latency: LatencyTracker::default(),
            chart: Arc::new(RwLock::new(TickBuffer::new(config.chart_capacity))),
            subscribers: Vec::new(),
        }
    }

    pub fn chart(&self) -> ChartHandle {
        ChartHandle {
            inner: Arc::clone(&self.chart),
        }
    }

    /// Register a component interested in tick reports.
    pub fn subscribe(&mut self, sender: Sender<TickReport>) {
        self.subscribers.push(sender);
        debug!(subscribers = self.subscribers.len(), "Added tick report subscriber");
    }

    /// Consume feed events until the channel closes.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut events: Receiver<FeedEvent>) {
        info!("Beginning metrics processing loop");

        while let Some(event) = events.recv().await {
            if let Some(report) = self.process_event(event) {
                self.broadcast(&report);
            }
        }

        warn!("Feed channel closed; metrics processing loop terminated");
    }

    /// Handle one feed event synchronously.
    pub fn process_event(&mut self, event: FeedEvent) -> Option<TickReport> {
        match event {
            FeedEvent::Book(msg) => self.on_book(&msg),
            FeedEvent::Connected => {
                info!("Feed session started; clearing book and chart");
                self.reset();
                None
            }
            FeedEvent::Subscribed => {
                info!("Feed subscription confirmed");
                None
            }
            FeedEvent::Error(msg) => {
                warn!(error = %msg, "Feed reported an error");
                None
            }
            FeedEvent::Unknown(v) => {
                debug!(event = %v, "Ignoring unrecognized feed event");
                None
            }
        }
    }

    fn on_book(&mut self, msg: &BookMessage) -> Option<TickReport> {
        let ts_ms = now_ms();
        self.book.apply(msg, ts_ms);

        let snapshot = self.engine_input(msg);
        let params = self.params.borrow().clone();

        let computed = warn_if_slow("cost_engine", self.config.slow_tick, || {
            compute_cost_metrics(&snapshot, &params)
        });

        let metrics = match computed {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "Cost engine rejected tick; skipping");
                return None;
            }
        };

        let summary = MarketSummary::from_snapshot(&snapshot)?;

        self.latency.record(metrics.latency_seconds);
        let chart = self.chart.write().append(&metrics);

        debug!(
            net_cost = metrics.net_cost,
            slippage = metrics.slippage,
            market_impact = metrics.market_impact,
            chart_len = chart.len(),
            "Tick processed"
        );

        Some(TickReport {
            ts_ms,
            summary,
            metrics,
            chart,
            latency: self.latency.stats(),
        })
    }

    fn engine_input(&self, msg: &BookMessage) -> OrderBookSnapshot {
        match msg.action {
            BookAction::Snapshot => OrderBookSnapshot::new(msg.bids.clone(), msg.asks.clone()),
            BookAction::Update => self.book.snapshot(self.config.book_depth),
        }
    }

    fn broadcast(&mut self, report: &TickReport) {
        self.subscribers.retain(|ch| {
            if ch.is_closed() {
                debug!("Dropping closed tick report subscriber");
                return false;
            }
            if let Err(e) = ch.try_send(report.clone()) {
                warn!(error = %e, "Failed to send tick report to subscriber (channel full or closed)");
            }
            true
        });
    }

    /// Clear all per-session state.
    pub fn reset(&mut self) {
        self.book.clear();
        self.latency.reset();
        self.chart.write().reset();
    }
}
