//! Session-level events published on the store's broadcast bus.
//!
//! Consumers subscribe via
//! [`SharedJobStore::subscribe`](crate::store::SharedJobStore::subscribe)
//! and react to merges, stream connectivity, and health transitions
//! without polling.

use ranktrack_client::health::HealthState;
use ranktrack_core::types::JobId;
use serde::Serialize;

/// An observable state change within one dashboard session.
#[derive(Debug, Clone, Serialize)]
pub enum SyncEvent {
    /// The push channel was established.
    StreamConnected,

    /// The push channel was lost; missed events are recovered by the
    /// next snapshot pull.
    StreamDisconnected,

    /// A full snapshot was merged into the store.
    SnapshotLoaded {
        /// Number of records in the snapshot.
        count: usize,
    },

    /// An update event was merged into an existing record.
    JobUpdated { job_id: JobId },

    /// An update event referenced an unseen id; a minimal record was
    /// created pending snapshot backfill.
    JobDiscovered { job_id: JobId },

    /// The backend liveness state changed.
    HealthChanged { state: HealthState },
}
