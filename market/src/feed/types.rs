use crate::types::PriceLevel;

/// Whether a book message carries the full ladder or a delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BookAction {
    #[default]
    Snapshot,
    Update,
}

/// Decoded L2 book message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookMessage {
    pub action: BookAction,
    pub exchange: Option<String>,
    pub symbol: Option<String>,
    /// Upstream timestamp, as sent.
    pub timestamp: Option<String>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// Unified feed event.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// A fresh connection was established. Everything derived from the
    /// previous connection is stale.
    Connected,
    Book(BookMessage),
    Subscribed,
    Error(String),
    Unknown(serde_json::Value),
}
