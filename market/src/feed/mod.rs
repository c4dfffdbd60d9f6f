pub mod backoff;
pub mod parser;
pub mod types;
pub mod ws;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

pub use backoff::{Backoff, ReconnectPolicy};
pub use parser::{FeedError, parse_feed_message};
pub use types::{BookAction, BookMessage, FeedEvent};
pub use ws::L2WsClient;

/// Source of decoded order-book events.
///
/// Implementations own the connection (including reconnects) and deliver
/// events in arrival order. Gaps are allowed, reordering is not.
#[async_trait]
pub trait OrderBookFeed: Send + Sync + 'static {
    async fn stream(&self, sender: Sender<FeedEvent>) -> anyhow::Result<()>;
}
