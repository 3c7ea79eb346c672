//! Exponential-backoff reconnection for the push channel.
//!
//! When the update stream drops, the session calls [`reconnect_loop`]
//! to keep retrying with increasing delays until the connection is
//! restored or the [`CancellationToken`] fires. Events emitted by the
//! backend while disconnected are not replayed; the next snapshot pull
//! recovers them.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{StreamClient, StreamConnection};

/// Tunable parameters for the backoff strategy.
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to
/// [`ReconnectConfig::max_delay`].
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Retry the push-channel connection with exponential backoff.
///
/// Returns `Some(connection)` once a connection succeeds, or `None` if
/// `cancel` fires first.
pub async fn reconnect_loop(
    client: &StreamClient,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
) -> Option<StreamConnection> {
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        // Wait before the attempt, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reconnect cancelled");
                return None;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
        tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting to the update stream");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reconnect cancelled");
                return None;
            }
            result = client.connect() => {
                match result {
                    Ok(conn) => {
                        tracing::info!(attempt, "Update stream reconnected");
                        return Some(conn);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Reconnect attempt {attempt} failed");
                    }
                }
            }
        }

        delay = next_delay(delay, config);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ranktrack_client::config::BackendConfig;

    #[test]
    fn next_delay_doubles_by_default() {
        let config = ReconnectConfig::default();
        assert_eq!(
            next_delay(Duration::from_secs(1), &config),
            Duration::from_secs(2)
        );
        assert_eq!(
            next_delay(Duration::from_secs(4), &config),
            Duration::from_secs(8)
        );
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = ReconnectConfig {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(
            next_delay(Duration::from_secs(8), &config),
            Duration::from_secs(10)
        );
        assert_eq!(
            next_delay(Duration::from_secs(10), &config),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn backoff_sequence_reaches_and_holds_the_ceiling() {
        let config = ReconnectConfig::default();
        let mut delay = config.initial_delay;
        let expected = [1, 2, 4, 8, 16, 30, 30];

        for &expected_secs in &expected {
            assert_eq!(delay.as_secs(), expected_secs);
            delay = next_delay(delay, &config);
        }
    }

    #[tokio::test]
    async fn cancellation_token_stops_reconnect() {
        let cancel = CancellationToken::new();
        // Cancel up front -- the loop must return None without connecting.
        cancel.cancel();

        let config = BackendConfig::new("http://localhost:9", "key");
        let client = StreamClient::new(&config);

        let result = reconnect_loop(&client, &ReconnectConfig::default(), &cancel).await;
        assert!(result.is_none());
    }
}
