use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use market::feed::ReconnectPolicy;
use market::pipeline::PipelineConfig;
use market::types::{FeeTier, OrderParameters};

use crate::error::ConfigError;

pub const DEFAULT_FEED_URL: &str = "wss://ws.gomarket-cpp.goquant.io/ws/l2-orderbook/okx/BTC-USDT-SWAP";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// L2 order-book WebSocket endpoint.
    pub feed_url: String,

    /// Optional message sent after every connect (exchange-native feeds
    /// need an explicit channel subscription; the default feed does not).
    pub feed_subscribe: Option<serde_json::Value>,

    // =========================
    // Order being costed
    // =========================
    /// Initial order parameters. The pipeline re-reads them on every tick,
    /// so a front end may replace them at runtime.
    pub params: OrderParameters,

    // =========================
    // Pipeline
    // =========================
    pub pipeline: PipelineConfig,

    /// Capacity of the feed → pipeline channel.
    ///
    /// Acts as backpressure: if the pipeline falls behind, the feed worker
    /// stops reading from the socket instead of buffering without bound.
    pub event_queue_capacity: usize,

    /// Capacity of each report subscriber channel. Full subscribers miss
    /// reports; they never slow the pipeline down.
    pub report_queue_capacity: usize,

    // =========================
    // Transport
    // =========================
    pub reconnect: ReconnectPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = lookup("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

        let feed_subscribe = match lookup("FEED_SUBSCRIBE") {
            Some(raw) if !raw.trim().is_empty() => Some(serde_json::from_str(&raw)?),
            _ => None,
        };

        let defaults = OrderParameters::default();

        let quantity: f64 = parse_or(&lookup, "ORDER_QUANTITY", defaults.quantity)?;
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(ConfigError::Invalid {
                key: "ORDER_QUANTITY",
                value: quantity.to_string(),
                reason: "must be a positive number".into(),
            });
        }

        let params = OrderParameters {
            quantity,
            fee_tier: lookup("FEE_TIER").map(FeeTier::from).unwrap_or(defaults.fee_tier),
            volatility_hint: parse_or(&lookup, "VOLATILITY_HINT", defaults.volatility_hint)?,
            exchange: lookup("EXCHANGE").unwrap_or(defaults.exchange),
            asset: lookup("SPOT_ASSET").unwrap_or(defaults.asset),
            order_type: lookup("ORDER_TYPE").unwrap_or(defaults.order_type),
        };

        let pipeline_defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            book_depth: parse_or(&lookup, "BOOK_DEPTH", pipeline_defaults.book_depth)?,
            chart_capacity: parse_or(&lookup, "CHART_CAPACITY", pipeline_defaults.chart_capacity)?,
            slow_tick: Duration::from_millis(parse_or(
                &lookup,
                "SLOW_TICK_MS",
                pipeline_defaults.slow_tick.as_millis() as u64,
            )?),
        };

        let reconnect_defaults = ReconnectPolicy::default();
        let reconnect = ReconnectPolicy {
            initial_delay: Duration::from_millis(parse_or(
                &lookup,
                "RECONNECT_INITIAL_MS",
                reconnect_defaults.initial_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_or(
                &lookup,
                "RECONNECT_MAX_MS",
                reconnect_defaults.max_delay.as_millis() as u64,
            )?),
            max_retries: parse_or(&lookup, "RECONNECT_MAX_RETRIES", reconnect_defaults.max_retries)?,
        };

        Ok(Self {
            feed_url,
            feed_subscribe,
            params,
            pipeline,
            event_queue_capacity: parse_or(&lookup, "EVENT_QUEUE_CAPACITY", 1024)?,
            report_queue_capacity: parse_or(&lookup, "REPORT_QUEUE_CAPACITY", 64)?,
            reconnect,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
