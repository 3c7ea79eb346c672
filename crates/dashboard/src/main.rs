//! `ranktrack-dashboard` -- headless monitor for the rank-tracking
//! backend.
//!
//! Starts a dashboard session, keeps the job collection in sync via the
//! push channel plus a periodic snapshot refresh, and logs every state
//! change until interrupted.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default | Description                          |
//! |--------------------------|----------|---------|--------------------------------------|
//! | `RANKTRACK_API_URL`      | yes      | --      | Backend origin, e.g. `http://host:4000` |
//! | `RANKTRACK_API_KEY`      | yes      | --      | Static API key                       |
//! | `RANKTRACK_REFRESH_SECS` | no       | `30`    | Seconds between snapshot refreshes   |

use std::time::Duration;

use ranktrack_client::config::BackendConfig;
use ranktrack_sync::events::SyncEvent;
use ranktrack_sync::session::DashboardSession;

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default interval between snapshot refreshes -- the eventual
/// consistency backstop for events lost while the stream was down.
const DEFAULT_REFRESH_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ranktrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match BackendConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let refresh_secs: u64 = std::env::var("RANKTRACK_REFRESH_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_SECS);

    tracing::info!(
        base_url = %config.base_url,
        refresh_secs,
        "Starting ranktrack dashboard",
    );

    let session = DashboardSession::start(config).await;
    let mut events = session.subscribe();

    let mut ticker = tokio::time::interval(Duration::from_secs(refresh_secs));
    // The session already pulled once on start; skip the immediate tick.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, shutting down");
                break;
            }
            _ = ticker.tick() => {
                match session.refresh().await {
                    Ok(count) => tracing::debug!(count, "Periodic snapshot refresh"),
                    Err(e) => {
                        tracing::warn!(error = %e, "Snapshot refresh failed; keeping the previous view")
                    }
                }
            }
            event = events.recv() => match event {
                Ok(event) => report_event(&session, event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event consumer lagged behind the session bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    session.shutdown().await;
}

/// Log one session event, with a summary line after every merge.
async fn report_event(session: &DashboardSession, event: SyncEvent) {
    match event {
        SyncEvent::SnapshotLoaded { count } => {
            let analytics = session.analytics().await;
            tracing::info!(
                count,
                total = analytics.total,
                completed = analytics.completed,
                running = analytics.running,
                failed = analytics.failed,
                waiting = analytics.waiting,
                success_rate = analytics.success_rate,
                "Snapshot merged",
            );
        }
        SyncEvent::JobUpdated { job_id } => {
            tracing::info!(%job_id, "Job updated");
        }
        SyncEvent::JobDiscovered { job_id } => {
            tracing::info!(%job_id, "New job discovered via the stream");
        }
        SyncEvent::StreamConnected => {
            tracing::info!("Update stream connected");
        }
        SyncEvent::StreamDisconnected => {
            tracing::info!("Update stream disconnected, reconnect pending");
        }
        SyncEvent::HealthChanged { state } => {
            tracing::info!(state = state.as_str(), "Backend health changed");
        }
    }
}
