//! One dashboard session against one backend.
//!
//! [`DashboardSession`] owns the shared store, the HTTP client, and the
//! background tasks (push-channel loop, health monitor). Created once
//! at startup via [`DashboardSession::start`]; the returned `Arc` is
//! cheap to clone into consumers. Teardown is explicit:
//! [`shutdown`](DashboardSession::shutdown) cancels the master token
//! and no further store mutations occur from this session's stream or
//! health monitor afterwards.

use std::sync::Arc;
use std::time::Duration;

use ranktrack_client::api::{ApiError, BackendApi};
use ranktrack_client::config::BackendConfig;
use ranktrack_client::health::HealthState;
use ranktrack_core::analytics::JobAnalytics;
use ranktrack_core::error::CoreError;
use ranktrack_core::job::JobRecord;
use ranktrack_core::search::{validate_search_request, SearchRequest};
use tokio::sync::{broadcast, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::client::StreamClient;
use crate::events::SyncEvent;
use crate::health::run_health_monitor;
use crate::processor::process_messages;
use crate::reconnect::{reconnect_loop, ReconnectConfig};
use crate::store::SharedJobStore;
use crate::tailer::LogTailer;

/// Upper bound on waiting for a background task during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A live dashboard session: store, collaborator clients, and the
/// background tasks that keep them in sync.
pub struct DashboardSession {
    api: Arc<BackendApi>,
    store: Arc<SharedJobStore>,
    health_rx: watch::Receiver<HealthState>,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl DashboardSession {
    /// Start a session: pull the initial snapshot, then spawn the
    /// push-channel loop and the health monitor.
    ///
    /// A failed initial pull is logged and the session starts with an
    /// empty view; the periodic refresh and the stream will fill it in.
    pub async fn start(config: BackendConfig) -> Arc<Self> {
        let api = Arc::new(BackendApi::new(config));
        let store = Arc::new(SharedJobStore::new());
        let cancel = CancellationToken::new();
        let (health_tx, health_rx) = watch::channel(HealthState::Unknown);

        let session = Arc::new(Self {
            api: Arc::clone(&api),
            store: Arc::clone(&store),
            health_rx,
            cancel: cancel.clone(),
            tasks: Mutex::new(Vec::new()),
        });

        match session.refresh().await {
            Ok(count) => tracing::info!(count, "Initial job snapshot loaded"),
            Err(e) => {
                tracing::warn!(error = %e, "Initial job snapshot failed; starting with an empty view")
            }
        }

        let stream_client = StreamClient::new(api.config());
        let stream_task = tokio::spawn(run_stream_loop(
            stream_client,
            Arc::clone(&store),
            cancel.child_token(),
        ));

        let health_task = tokio::spawn(run_health_monitor(
            api,
            store,
            health_tx,
            cancel.child_token(),
        ));

        session.tasks.lock().await.extend([stream_task, health_task]);
        session
    }

    /// Subscribe to the session's event bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.store.subscribe()
    }

    /// The shared job store.
    pub fn store(&self) -> &Arc<SharedJobStore> {
        &self.store
    }

    /// Current backend liveness, `Unknown` until the first probe
    /// resolves.
    pub fn health(&self) -> HealthState {
        *self.health_rx.borrow()
    }

    /// Pull a fresh snapshot into the store. Returns the record count.
    ///
    /// On failure the store is untouched and the previous view stays
    /// valid (stale-but-available).
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let records = self.api.fetch_jobs().await?;
        Ok(self.store.load_snapshot(records).await)
    }

    /// Validate and submit a rank-tracking search, then re-pull the
    /// snapshot so the created jobs become visible. Returns the record
    /// count after the refresh.
    pub async fn create_job(&self, request: &SearchRequest) -> Result<usize, SessionError> {
        validate_search_request(request)?;
        self.api.submit_search(request).await?;
        tracing::info!(
            product_name = %request.product_name,
            target_asin = %request.target_asin,
            count = request.count,
            "Rank-tracking job submitted",
        );
        Ok(self.refresh().await?)
    }

    /// Fetch the execution history side channel (not merged into the
    /// store).
    pub async fn history(&self) -> Result<Vec<JobRecord>, ApiError> {
        self.api.fetch_history().await
    }

    /// Aggregate counters derived locally from the store.
    pub async fn analytics(&self) -> JobAnalytics {
        self.store.analytics().await
    }

    /// Aggregate counters from the backend's authoritative endpoint.
    pub async fn remote_analytics(&self) -> Result<JobAnalytics, ApiError> {
        self.api.fetch_analytics().await
    }

    /// A log view bound to this session's backend.
    pub fn log_tailer(&self) -> LogTailer {
        LogTailer::new(Arc::clone(&self.api))
    }

    /// Gracefully stop all background tasks.
    ///
    /// Cancels the master token, then waits up to [`SHUTDOWN_TIMEOUT`]
    /// per task for a clean exit.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down dashboard session");
        self.cancel.cancel();

        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await;
        }

        tracing::info!("Dashboard session shut down");
    }
}

/// Core push-channel loop: connect -> process -> reconnect.
///
/// Runs until the cancellation token fires. Cancellation halts frame
/// processing immediately, so no further store mutations originate here
/// after shutdown.
async fn run_stream_loop(
    client: StreamClient,
    store: Arc<SharedJobStore>,
    cancel: CancellationToken,
) {
    let reconnect_config = ReconnectConfig::default();

    loop {
        let conn = tokio::select! {
            _ = cancel.cancelled() => return,
            result = client.connect() => match result {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Update stream connection failed, entering reconnect loop");
                    match reconnect_loop(&client, &reconnect_config, &cancel).await {
                        Some(conn) => conn,
                        None => return, // cancelled
                    }
                }
            },
        };

        store.publish(SyncEvent::StreamConnected);

        let mut ws_stream = conn.ws_stream;
        tokio::select! {
            _ = cancel.cancelled() => {
                store.publish(SyncEvent::StreamDisconnected);
                return;
            }
            _ = process_messages(&mut ws_stream, &store) => {}
        }

        store.publish(SyncEvent::StreamDisconnected);

        if cancel.is_cancelled() {
            return;
        }
        tracing::info!("Update stream lost, reconnecting");
    }
}

/// Errors from session-level operations that combine validation and
/// backend calls.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request was rejected before reaching the network.
    #[error("Invalid job request: {0}")]
    Invalid(#[from] CoreError),

    /// A backend call failed.
    #[error("Backend request failed: {0}")]
    Api(#[from] ApiError),
}
