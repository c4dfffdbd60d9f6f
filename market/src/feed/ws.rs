use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, trace, warn};

use super::backoff::{Backoff, ReconnectPolicy};
use super::parser::parse_feed_message;
use super::types::FeedEvent;
use super::OrderBookFeed;

/// WebSocket implementation of an L2 order-book feed.
pub struct L2WsClient {
    pub ws_url: String,
    /// Sent once after every successful connect, if set.
    pub subscribe_msg: Option<serde_json::Value>,
    pub policy: ReconnectPolicy,
}

impl L2WsClient {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            subscribe_msg: None,
            policy: ReconnectPolicy::default(),
        }
    }

    pub fn with_subscribe(mut self, msg: serde_json::Value) -> Self {
        self.subscribe_msg = Some(msg);
        self
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn send_subscribe<E>(
        write: &mut (impl futures::Sink<Message, Error = E> + Unpin),
        msg: &serde_json::Value,
    ) -> anyhow::Result<()>
    where
        E: std::fmt::Debug + Send + Sync + 'static,
    {
        let text = serde_json::to_string(msg)?;
        debug!(payload = %text, "Sending subscribe request");

        write
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| anyhow::anyhow!("failed to send subscribe message: {:?}", e))
    }
}

/// Outcome of one connected session.
enum SessionEnd {
    /// Socket closed or errored; reconnect.
    Disconnected,
    /// Downstream receiver is gone; stop for good.
    ReceiverDropped,
}

#[async_trait]
impl OrderBookFeed for L2WsClient {
    /// Stream decoded book events with reconnect-and-backoff.
    ///
    /// Returns `Ok(())` when the receiving side is dropped and an error once
    /// the reconnect budget is exhausted.
    #[instrument(skip(self, sender), fields(url = %self.ws_url))]
    async fn stream(&self, sender: Sender<FeedEvent>) -> anyhow::Result<()> {
        info!("Starting L2 feed worker");
        let mut backoff = Backoff::new(self.policy);

        loop {
            debug!("Attempting connection to feed");
            match connect_async(self.ws_url.as_str()).await {
                Ok((ws, _)) => {
                    info!("WebSocket connection established");
                    backoff.reset();

                    let (mut write, mut read) = ws.split();

                    if sender.send(FeedEvent::Connected).await.is_err() {
                        info!("Feed receiver dropped; worker stopping");
                        return Ok(());
                    }

                    let subscribed = match &self.subscribe_msg {
                        Some(msg) => Self::send_subscribe(&mut write, msg).await,
                        None => Ok(()),
                    };

                    match subscribed {
                        Err(e) => {
                            error!(error = ?e, "Subscription failed; retrying connection");
                        }
                        Ok(()) => {
                            let end = pump_messages(&mut read, &sender).await;
                            if let SessionEnd::ReceiverDropped = end {
                                info!("Feed receiver dropped; worker stopping");
                                return Ok(());
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(error = ?e, "WebSocket connection failed");
                }
            }

            let Some(delay) = backoff.next_delay() else {
                error!(retries = backoff.retries(), "Reconnect budget exhausted");
                return Err(anyhow::anyhow!(
                    "feed {} unreachable after {} attempts",
                    self.ws_url,
                    backoff.retries()
                ));
            };

            warn!(delay = ?delay, attempt = backoff.retries(), "Disconnected; attempting reconnection");
            tokio::time::sleep(delay).await;
        }
    }
}

/// Forward every decodable frame until the socket ends.
async fn pump_messages<S>(read: &mut S, sender: &Sender<FeedEvent>) -> SessionEnd
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!(error = ?e, "WebSocket stream error encountered");
                return SessionEnd::Disconnected;
            }
        };

        if msg.is_ping() || msg.is_pong() {
            trace!("Received keep-alive frame");
            continue;
        }

        if msg.is_close() {
            info!("Server closed the connection");
            return SessionEnd::Disconnected;
        }

        if !msg.is_text() {
            debug!(msg_type = ?msg, "Ignoring non-text WebSocket message");
            continue;
        }

        let raw = match msg.to_text() {
            Ok(t) => t,
            Err(e) => {
                error!(error = ?e, "Failed to extract text from WS message");
                continue;
            }
        };

        trace!(raw_event = %raw, "Received raw WebSocket message");

        match parse_feed_message(raw) {
            Ok(Some(ev)) => {
                if sender.send(ev).await.is_err() {
                    return SessionEnd::ReceiverDropped;
                }
            }
            Ok(None) => trace!("Received non-actionable frame"),
            Err(e) => warn!(error = %e, "Failed to decode feed message; skipping"),
        }
    }

    SessionEnd::Disconnected
}
