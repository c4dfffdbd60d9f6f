use std::future::Future;

use anyhow::anyhow;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Waits until either the shutdown signal fires or the feed worker ends.
///
/// The feed worker only returns after its reconnect budget is spent (or its
/// consumer is gone), so its end is fatal for the process and is surfaced as
/// an error.
pub async fn run_until_shutdown<S>(
    feed: JoinHandle<anyhow::Result<()>>,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        signal = shutdown => {
            signal?;
            warn!("Shutdown signal received");
            Ok(())
        }
        joined = feed => {
            match joined {
                Ok(Ok(())) => Err(anyhow!("L2 feed worker exited")),
                Ok(Err(e)) => {
                    error!(error = ?e, "L2 feed worker stopped");
                    Err(e.context("L2 feed worker stopped"))
                }
                Err(e) => Err(anyhow!(e).context("L2 feed worker panicked")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;

    #[tokio::test]
    async fn feed_failure_ends_the_process() {
        let feed = tokio::spawn(async { Err(anyhow!("gave up after 10 retries")) });

        let err = run_until_shutdown(feed, pending()).await.unwrap_err();

        assert!(format!("{err:#}").contains("gave up after 10 retries"));
    }

    #[tokio::test]
    async fn feed_exit_without_error_is_still_fatal() {
        let feed = tokio::spawn(async { Ok(()) });
        assert!(run_until_shutdown(feed, pending()).await.is_err());
    }

    #[tokio::test]
    async fn shutdown_signal_stops_cleanly() {
        let feed = tokio::spawn(pending::<anyhow::Result<()>>());
        let result = run_until_shutdown(feed, async { Ok(()) }).await;
        assert!(result.is_ok());
    }
}
