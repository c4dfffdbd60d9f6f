use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, info};

use common::logger::{TraceId, child_span, init_logger, root_span};
use market::{
    feed::{FeedEvent, L2WsClient, OrderBookFeed},
    pipeline::{MetricsPipeline, TickReport},
};
use monitor::{config::AppConfig, supervise::run_until_shutdown};

/// Starts the feed worker; it owns the connection and reconnects on its own.
fn start_feed(cfg: &AppConfig, events_tx: mpsc::Sender<FeedEvent>) -> JoinHandle<anyhow::Result<()>> {
    let mut client = L2WsClient::new(cfg.feed_url.clone()).with_policy(cfg.reconnect);
    if let Some(msg) = &cfg.feed_subscribe {
        client = client.with_subscribe(msg.clone());
    }

    tokio::spawn(async move { client.stream(events_tx).await }.instrument(child_span("feed")))
}

/// Logs every tick report. Stands in for the dashboard.
fn start_reporter(mut reports: mpsc::Receiver<TickReport>) {
    tokio::spawn(
        async move {
            while let Some(r) = reports.recv().await {
                info!(
                    best_bid = %r.summary.best_bid,
                    best_ask = %r.summary.best_ask,
                    spread = %r.summary.spread,
                    slippage = r.metrics.slippage,
                    fees = r.metrics.fees,
                    market_impact = r.metrics.market_impact,
                    net_cost = r.metrics.net_cost,
                    maker_taker = r.metrics.maker_taker_ratio,
                    latency_s = r.metrics.latency_seconds,
                    chart_points = r.chart.len(),
                    "tick"
                );
            }
        }
        .instrument(child_span("reporter")),
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("monitor", is_production);

    let cfg = AppConfig::from_env().context("failed to load configuration")?;

    let trace_id = TraceId::default();
    let root = root_span("monitor", &trace_id);
    root.record("pair", cfg.params.asset.as_str());

    info!(
        parent: &root,
        feed = %cfg.feed_url,
        quantity = cfg.params.quantity,
        fee_tier = %cfg.params.fee_tier,
        "Starting trade-cost monitor"
    );

    // The sender is the hook for a front end to swap order parameters.
    let (_params_tx, params_rx) = watch::channel(cfg.params.clone());

    let (events_tx, events_rx) = mpsc::channel(cfg.event_queue_capacity);
    let (reports_tx, reports_rx) = mpsc::channel(cfg.report_queue_capacity);

    let mut pipeline = MetricsPipeline::new(cfg.pipeline, params_rx);
    pipeline.subscribe(reports_tx);

    let feed = root.in_scope(|| {
        start_reporter(reports_rx);
        tokio::spawn(pipeline.run(events_rx).instrument(child_span("pipeline")));
        start_feed(&cfg, events_tx)
    });

    run_until_shutdown(feed, tokio::signal::ctrl_c())
        .instrument(root)
        .await
}
