//! L2 feed message parser.
//!
//! Two wire shapes are understood. The flat shape carries one full book per
//! message:
//!
//! ```jsonc
//! {
//!   "timestamp": "2025-05-04T10:39:13Z",
//!   "exchange": "OKX",
//!   "symbol": "BTC-USDT-SWAP",
//!   "asks": [["95445.5", "9.06"], ["95448", "2.398"]],
//!   "bids": [["95445.4", "1104.23"], ["95445.3", "0.02"]]
//! }
//! ```
//!
//! The exchange envelope shape wraps the book in `data` and may carry deltas:
//!
//! ```jsonc
//! {
//!   "arg": { "channel": "books", "instId": "BTC-USDT-SWAP" },
//!   "action": "update",
//!   "data": [{ "asks": [["95446", "0", "0", "0"]], "bids": [], "ts": "1714810753000" }]
//! }
//! ```
//!
//! Control frames (`{"event": "subscribe" | "error", ...}`) map to
//! `FeedEvent::Subscribed` / `FeedEvent::Error`. Bare `pong` keep-alives
//! yield `None`. Anything else is forwarded as `FeedEvent::Unknown`.
//!
//! Levels may carry trailing fields; only `[price, size]` are read. Prices
//! and sizes may be JSON strings or numbers.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::types::{BookAction, BookMessage, FeedEvent};
use crate::types::PriceLevel;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("book message is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid price level: {0}")]
    InvalidLevel(String),
}

#[derive(Debug, Deserialize)]
struct RawBook {
    #[serde(default)]
    bids: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    asks: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default, alias = "ts")]
    timestamp: Option<Value>,
}

pub fn parse_feed_message(raw: &str) -> Result<Option<FeedEvent>, FeedError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("pong") {
        return Ok(None);
    }

    let json: Value = serde_json::from_str(trimmed)?;

    // CONTROL
    if let Some(event) = json.get("event").and_then(Value::as_str) {
        return Ok(Some(match event {
            "subscribe" => FeedEvent::Subscribed,
            "error" => FeedEvent::Error(
                json.get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("unspecified feed error")
                    .to_string(),
            ),
            _ => FeedEvent::Unknown(json.clone()),
        }));
    }

    // ENVELOPE
    if let Some(data) = json.get("data") {
        let body = match data {
            Value::Array(items) => match items.first() {
                Some(first) => first.clone(),
                None => return Ok(None),
            },
            Value::Object(_) => data.clone(),
            _ => return Ok(Some(FeedEvent::Unknown(json.clone()))),
        };

        let action = match json.get("action").and_then(Value::as_str) {
            Some("update") => BookAction::Update,
            _ => BookAction::Snapshot,
        };

        let mut book = decode_book(body, action)?;
        if book.symbol.is_none() {
            book.symbol = json
                .get("arg")
                .and_then(|a| a.get("instId"))
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        return Ok(Some(FeedEvent::Book(book)));
    }

    // FLAT BOOK
    if json.get("bids").is_some() || json.get("asks").is_some() {
        return Ok(Some(FeedEvent::Book(decode_book(json, BookAction::Snapshot)?)));
    }

    Ok(Some(FeedEvent::Unknown(json)))
}

fn decode_book(body: Value, action: BookAction) -> Result<BookMessage, FeedError> {
    let raw: RawBook = serde_json::from_value(body)?;

    let bids = raw.bids.ok_or(FeedError::MissingField("bids"))?;
    let asks = raw.asks.ok_or(FeedError::MissingField("asks"))?;

    Ok(BookMessage {
        action,
        exchange: raw.exchange,
        symbol: raw.symbol,
        timestamp: raw.timestamp.map(|t| match t {
            Value::String(s) => s,
            other => other.to_string(),
        }),
        bids: decode_levels(&bids)?,
        asks: decode_levels(&asks)?,
    })
}

fn decode_levels(levels: &[Vec<Value>]) -> Result<Vec<PriceLevel>, FeedError> {
    levels
        .iter()
        .map(|lvl| match lvl.as_slice() {
            [price, size, ..] => Ok(PriceLevel::new(decimal(price)?, decimal(size)?)),
            _ => Err(FeedError::InvalidLevel(format!("{lvl:?}"))),
        })
        .collect()
}

fn decimal(v: &Value) -> Result<Decimal, FeedError> {
    let parsed = match v {
        Value::String(s) => Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)),
        Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s).or_else(|_| Decimal::from_scientific(&s))
        }
        _ => return Err(FeedError::InvalidLevel(v.to_string())),
    };

    parsed.map_err(|_| FeedError::InvalidLevel(v.to_string()))
}
