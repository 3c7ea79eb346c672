//! Integration tests for the shared store and session lifecycle.
//!
//! Walks the reconciliation scenarios end to end through
//! [`SharedJobStore`] with a live subscription, the way the session's
//! snapshot and stream paths drive it in production.

use std::sync::Arc;

use assert_matches::assert_matches;
use ranktrack_client::config::BackendConfig;
use ranktrack_core::job::{JobRecord, JobStatus, JobUpdate};
use ranktrack_sync::events::SyncEvent;
use ranktrack_sync::session::DashboardSession;
use ranktrack_sync::store::SharedJobStore;

fn snapshot_record(id: &str, status: JobStatus, name: &str, asin: &str) -> JobRecord {
    let mut record = JobRecord::new(id, status);
    record.product_name = Some(name.to_string());
    record.target_asin = Some(asin.to_string());
    record
}

/// Snapshot load, stream update, terminal stickiness, and snapshot
/// backfill -- the full reconciliation walk, observed via the bus.
#[tokio::test]
async fn snapshot_then_stream_reconciliation_scenario() {
    let store = SharedJobStore::new();
    let mut events = store.subscribe();

    // Session start: the snapshot pull populates the empty store.
    store
        .load_snapshot(vec![snapshot_record("1", JobStatus::Waiting, "p", "A1")])
        .await;
    assert_matches!(events.recv().await, Ok(SyncEvent::SnapshotLoaded { count: 1 }));

    let records = store.snapshot().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, JobStatus::Waiting);
    assert_eq!(records[0].product_name.as_deref(), Some("p"));

    // The stream finishes the job before any snapshot reflects it.
    store
        .apply_update(&JobUpdate {
            job_id: "1".into(),
            status: JobStatus::Completed,
            rank_position: Some(5),
            price: None,
        })
        .await
        .unwrap();
    assert_matches!(events.recv().await, Ok(SyncEvent::JobUpdated { job_id }) if job_id == "1");

    let record = &store.snapshot().await[0];
    assert_eq!(record.status, JobStatus::Completed);
    assert_eq!(record.rank_position, Some(5));
    assert_eq!(record.product_name.as_deref(), Some("p"));
    assert_eq!(record.target_asin.as_deref(), Some("A1"));
    assert!(record.finished_at.is_some());

    // A stale snapshot arrives late; the terminal status must hold.
    store
        .load_snapshot(vec![snapshot_record("1", JobStatus::Running, "p", "A1")])
        .await;
    assert_matches!(events.recv().await, Ok(SyncEvent::SnapshotLoaded { .. }));
    assert_eq!(store.snapshot().await[0].status, JobStatus::Completed);
}

/// A stream-discovered job starts minimal and is backfilled by the next
/// snapshot without its status moving backwards.
#[tokio::test]
async fn stream_discovery_then_snapshot_backfill() {
    let store = SharedJobStore::new();
    let mut events = store.subscribe();

    store
        .apply_update(&JobUpdate {
            job_id: "2".into(),
            status: JobStatus::Running,
            rank_position: None,
            price: None,
        })
        .await
        .unwrap();
    assert_matches!(events.recv().await, Ok(SyncEvent::JobDiscovered { job_id }) if job_id == "2");

    let record = &store.snapshot().await[0];
    assert_eq!(record.id, "2");
    assert_eq!(record.status, JobStatus::Running);
    assert!(record.product_name.is_none());
    assert!(record.target_asin.is_none());

    store
        .load_snapshot(vec![snapshot_record("2", JobStatus::Running, "q", "A2")])
        .await;

    let record = &store.snapshot().await[0];
    assert_eq!(record.status, JobStatus::Running);
    assert_eq!(record.product_name.as_deref(), Some("q"));
    assert_eq!(record.target_asin.as_deref(), Some("A2"));
}

/// Shutdown against an unreachable backend: the background tasks must
/// stop promptly and the session must come down cleanly.
#[tokio::test]
async fn session_shutdown_stops_background_tasks() {
    let config = BackendConfig::new("http://127.0.0.1:9", "key");
    let session = DashboardSession::start(config).await;

    // The initial pull failed; the view is empty but valid.
    assert!(session.store().snapshot().await.is_empty());

    let shutdown = tokio::time::timeout(std::time::Duration::from_secs(10), async {
        session.shutdown().await;
    })
    .await;
    assert!(shutdown.is_ok(), "shutdown should complete promptly");
}

/// Disposing the session must not tear down independent clones of the
/// store that consumers still hold.
#[tokio::test]
async fn store_outlives_session_shutdown() {
    let config = BackendConfig::new("http://127.0.0.1:9", "key");
    let session = DashboardSession::start(config).await;
    let store = Arc::clone(session.store());

    session.shutdown().await;

    store
        .load_snapshot(vec![snapshot_record("1", JobStatus::Waiting, "p", "A1")])
        .await;
    assert_eq!(store.snapshot().await.len(), 1);
}
