//! Backend liveness polling loop.
//!
//! Polls `GET /health` on a fixed interval and reduces the result to a
//! [`HealthState`]. The current state lives in a `watch` channel for
//! point-in-time reads; transitions are additionally announced on the
//! session bus. This loop never touches the job store's records.

use std::sync::Arc;
use std::time::Duration;

use ranktrack_client::api::BackendApi;
use ranktrack_client::health::HealthState;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::events::SyncEvent;
use crate::store::SharedJobStore;

/// Fixed interval between liveness probes.
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Run the liveness poll loop until cancelled.
///
/// `state_tx` starts at [`HealthState::Unknown`]; the first probe
/// resolves it to `Healthy` or `Unhealthy` and every later probe only
/// publishes a [`SyncEvent::HealthChanged`] when the state actually
/// changes.
pub async fn run_health_monitor(
    api: Arc<BackendApi>,
    store: Arc<SharedJobStore>,
    state_tx: watch::Sender<HealthState>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(HEALTH_POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Health monitor cancelled");
                return;
            }
            _ = ticker.tick() => {
                let state = api.check_health().await;
                let previous = *state_tx.borrow();
                if state != previous {
                    tracing::info!(
                        from = previous.as_str(),
                        to = state.as_str(),
                        "Backend health changed",
                    );
                    let _ = state_tx.send(state);
                    store.publish(SyncEvent::HealthChanged { state });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
