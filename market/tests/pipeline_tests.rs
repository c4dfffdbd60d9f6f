use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};

use market::{
    feed::{BookAction, BookMessage, FeedEvent, OrderBookFeed},
    pipeline::{MetricsPipeline, PipelineConfig, TickReport},
    types::{FeeTier, OrderParameters, PriceLevel},
};

/// Replays a fixed list of events, then ends the stream.
struct MockFeed {
    events: Vec<FeedEvent>,
}

#[async_trait::async_trait]
impl OrderBookFeed for MockFeed {
    async fn stream(&self, sender: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
        for ev in self.events.clone() {
            sender.send(ev).await?;
        }
        Ok(())
    }
}

fn lvl(price: i64, size: i64) -> PriceLevel {
    PriceLevel::new(Decimal::from(price), Decimal::from(size))
}

fn snapshot(best_bid: i64) -> FeedEvent {
    FeedEvent::Book(BookMessage {
        action: BookAction::Snapshot,
        bids: vec![lvl(best_bid, 1), lvl(best_bid - 1, 2)],
        asks: vec![lvl(best_bid + 1, 1), lvl(best_bid + 2, 1)],
        ..BookMessage::default()
    })
}

fn update(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> FeedEvent {
    FeedEvent::Book(BookMessage {
        action: BookAction::Update,
        bids,
        asks,
        ..BookMessage::default()
    })
}

async fn run_feed(events: Vec<FeedEvent>, params: OrderParameters) -> (Vec<TickReport>, usize) {
    let (_params_tx, params_rx) = watch::channel(params);
    let mut pipeline = MetricsPipeline::new(PipelineConfig::default(), params_rx);

    let (report_tx, mut report_rx) = mpsc::channel(128);
    pipeline.subscribe(report_tx);
    let chart = pipeline.chart();

    let (feed_tx, feed_rx) = mpsc::channel(128);
    let feed = MockFeed { events };

    let worker = tokio::spawn(pipeline.run(feed_rx));
    feed.stream(feed_tx).await.unwrap();
    worker.await.unwrap();

    let mut reports = Vec::new();
    while let Ok(r) = report_rx.try_recv() {
        reports.push(r);
    }
    (reports, chart.len())
}

#[tokio::test]
async fn every_valid_tick_is_reported_in_order() {
    let events = vec![FeedEvent::Connected, snapshot(100), snapshot(200), snapshot(300)];
    let (reports, chart_len) = run_feed(events, OrderParameters::default()).await;

    assert_eq!(reports.len(), 3);
    let best_bids: Vec<Decimal> = reports.iter().map(|r| r.summary.best_bid).collect();
    assert_eq!(
        best_bids,
        vec![Decimal::from(100), Decimal::from(200), Decimal::from(300)]
    );
    assert_eq!(reports[2].chart.len(), 3);
    assert_eq!(chart_len, 3);
}

#[tokio::test]
async fn deltas_are_merged_into_local_book() {
    let events = vec![
        FeedEvent::Connected,
        snapshot(100),
        // best bid leaves, a deeper level shows up
        update(vec![lvl(100, 0), lvl(95, 10)], vec![]),
    ];
    let (reports, _) = run_feed(events, OrderParameters::default()).await;

    assert_eq!(reports.len(), 2);
    let last = &reports[1];
    assert_eq!(last.summary.best_bid, Decimal::from(99));
    assert_eq!(last.summary.bid_volume, Decimal::from(12));
    assert_eq!(last.metrics.implied_liquidity, 14.0);
}

#[tokio::test]
async fn bad_ticks_are_skipped_without_touching_chart() {
    let events = vec![
        FeedEvent::Connected,
        snapshot(100),
        // one-sided book
        FeedEvent::Book(BookMessage {
            bids: vec![],
            asks: vec![lvl(101, 1)],
            ..BookMessage::default()
        }),
        snapshot(100),
    ];
    let (reports, chart_len) = run_feed(events, OrderParameters::default()).await;

    assert_eq!(reports.len(), 2);
    assert_eq!(chart_len, 2);
}

#[tokio::test]
async fn invalid_quantity_yields_no_reports() {
    let events = vec![FeedEvent::Connected, snapshot(100), snapshot(101)];
    let (reports, chart_len) = run_feed(events, OrderParameters::new(0.0, FeeTier::Tier1)).await;

    assert!(reports.is_empty());
    assert_eq!(chart_len, 0);
}

#[tokio::test]
async fn reconnect_starts_a_new_chart() {
    let mut events = vec![FeedEvent::Connected];
    events.extend((0..60).map(|i| snapshot(100 + i)));
    events.push(FeedEvent::Connected);
    events.push(snapshot(500));

    let (reports, chart_len) = run_feed(events, OrderParameters::default()).await;

    assert_eq!(reports.len(), 61);
    // 60th tick of the first session saw a full window
    assert_eq!(reports[59].chart.len(), 50);
    assert_eq!(reports[60].chart.len(), 1);
    assert_eq!(chart_len, 1);
}

#[tokio::test]
async fn slow_subscriber_does_not_block_pipeline() {
    let (_params_tx, params_rx) = watch::channel(OrderParameters::default());
    let mut pipeline = MetricsPipeline::new(PipelineConfig::default(), params_rx);

    // capacity 1 and never drained
    let (slow_tx, _slow_rx) = mpsc::channel(1);
    pipeline.subscribe(slow_tx);
    let chart = pipeline.chart();

    let (feed_tx, feed_rx) = mpsc::channel(16);
    let worker = tokio::spawn(pipeline.run(feed_rx));

    for i in 0..5 {
        feed_tx.send(snapshot(100 + i)).await.unwrap();
    }
    drop(feed_tx);

    tokio::time::timeout(Duration::from_secs(2), worker)
        .await
        .expect("pipeline stalled on a full subscriber")
        .unwrap();

    assert_eq!(chart.len(), 5);
}
