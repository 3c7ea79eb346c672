//! Shared observable wrapper around the core job store.
//!
//! [`SharedJobStore`] is the session's single source of truth: both
//! merge entry points go through it, and every successful merge is
//! announced on a [`tokio::sync::broadcast`] bus so that consumers can
//! re-render without being coupled to the merge algorithm. Subscribing
//! returns a receiver; unsubscribing is dropping it.

use ranktrack_core::analytics::{self, JobAnalytics};
use ranktrack_core::error::CoreError;
use ranktrack_core::job::{JobRecord, JobUpdate};
use ranktrack_core::store::{JobStore, UpdateOutcome};
use tokio::sync::{broadcast, RwLock};

use crate::events::SyncEvent;

/// Broadcast channel capacity for session events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Thread-safe, observable job store shared across the session's tasks.
pub struct SharedJobStore {
    inner: RwLock<JobStore>,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl SharedJobStore {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(JobStore::new()),
            event_tx,
        }
    }

    /// Subscribe to all events published within this session.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    /// Publish a session event to all current subscribers.
    ///
    /// Zero subscribers is not an error; the event is simply dropped.
    pub(crate) fn publish(&self, event: SyncEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Merge a full snapshot and announce it. Returns the record count
    /// of the snapshot.
    pub async fn load_snapshot(&self, records: Vec<JobRecord>) -> usize {
        let count = records.len();
        self.inner.write().await.load_snapshot(records);
        self.publish(SyncEvent::SnapshotLoaded { count });
        count
    }

    /// Merge one update event and announce the outcome.
    ///
    /// Malformed events are rejected without touching the collection or
    /// the bus.
    pub async fn apply_update(&self, update: &JobUpdate) -> Result<UpdateOutcome, CoreError> {
        let outcome = self.inner.write().await.apply_update(update)?;
        let event = match outcome {
            UpdateOutcome::Inserted => SyncEvent::JobDiscovered {
                job_id: update.job_id.clone(),
            },
            UpdateOutcome::Merged => SyncEvent::JobUpdated {
                job_id: update.job_id.clone(),
            },
        };
        self.publish(event);
        Ok(outcome)
    }

    /// A point-in-time copy of the visible collection, in display order.
    pub async fn snapshot(&self) -> Vec<JobRecord> {
        self.inner.read().await.records().to_vec()
    }

    /// Derive aggregate counters from the current contents.
    pub async fn analytics(&self) -> JobAnalytics {
        analytics::project(self.inner.read().await.records())
    }
}

impl Default for SharedJobStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
