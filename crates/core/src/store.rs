//! Client-local job collection and its two merge entry points.
//!
//! [`JobStore`] reconciles two asynchronously-arriving sources that
//! describe the same jobs: full snapshots pulled over HTTP and partial
//! update events pushed over the stream. Merges are commutative and
//! idempotent with respect to arrival order; the only ordering the
//! backend guarantees is arrival order, so nothing here assumes a
//! snapshot and the events it subsumes arrive in logical order.

use chrono::Utc;

use crate::error::CoreError;
use crate::job::{JobRecord, JobUpdate};

/// What [`JobStore::apply_update`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The event referenced an unknown id; a minimal record was created
    /// at the front of the visible ordering.
    Inserted,
    /// The event was merged into an existing record.
    Merged,
}

/// Single source of truth for the job records visible to the session.
///
/// All writes go through [`load_snapshot`](Self::load_snapshot) and
/// [`apply_update`](Self::apply_update); both preserve the invariants:
/// ids are unique, terminal statuses are sticky, and descriptive fields
/// never change once set.
#[derive(Debug, Default)]
pub struct JobStore {
    records: Vec<JobRecord>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a full snapshot into the collection.
    ///
    /// Records present in the snapshot end up in snapshot order, with
    /// every field present in the snapshot applied (a snapshot is
    /// authoritative) -- except that a terminal status is never
    /// regressed and descriptive fields already set are kept. Records
    /// the snapshot does not mention are retained in front of the
    /// snapshot ordering; nothing is ever deleted within a session.
    pub fn load_snapshot(&mut self, incoming: Vec<JobRecord>) {
        let mut existing = std::mem::take(&mut self.records);
        let mut merged = Vec::with_capacity(incoming.len() + existing.len());

        for snapshot_record in incoming {
            match existing.iter().position(|r| r.id == snapshot_record.id) {
                Some(idx) => {
                    let mut record = existing.remove(idx);
                    merge_snapshot_fields(&mut record, snapshot_record);
                    merged.push(record);
                }
                None => merged.push(snapshot_record),
            }
        }

        // Whatever the snapshot did not know about (stream-discovered
        // records the list endpoint has not surfaced yet) stays ahead.
        existing.extend(merged);
        self.records = existing;
    }

    /// Merge one partial update event.
    ///
    /// Only the fields present in the event are touched; an unknown id
    /// creates a minimal record at the front of the ordering. Applying
    /// the same event twice yields the same record as applying it once.
    pub fn apply_update(&mut self, update: &JobUpdate) -> Result<UpdateOutcome, CoreError> {
        if update.job_id.is_empty() {
            return Err(CoreError::Validation(
                "update event is missing a job id".to_string(),
            ));
        }

        match self.records.iter_mut().find(|r| r.id == update.job_id) {
            Some(record) => {
                if record.status.can_advance_to(update.status) {
                    record.status = update.status;
                }
                if let Some(rank) = update.rank_position {
                    record.rank_position = Some(rank);
                }
                if let Some(ref price) = update.price {
                    record.price = Some(price.clone());
                }
                if record.status.is_terminal() && record.finished_at.is_none() {
                    record.finished_at = Some(Utc::now());
                }
                Ok(UpdateOutcome::Merged)
            }
            None => {
                let mut record = JobRecord::new(update.job_id.clone(), update.status);
                record.rank_position = update.rank_position;
                record.price = update.price.clone();
                if record.status.is_terminal() {
                    record.finished_at = Some(Utc::now());
                }
                self.records.insert(0, record);
                Ok(UpdateOutcome::Inserted)
            }
        }
    }

    /// The current visible collection, in display order.
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Apply a snapshot record's fields onto a live record.
fn merge_snapshot_fields(record: &mut JobRecord, incoming: JobRecord) {
    if record.status.can_advance_to(incoming.status) {
        record.status = incoming.status;
    }
    // Descriptive fields are write-once: backfill only.
    if record.product_name.is_none() {
        record.product_name = incoming.product_name;
    }
    if record.target_asin.is_none() {
        record.target_asin = incoming.target_asin;
    }
    if incoming.rank_position.is_some() {
        record.rank_position = incoming.rank_position;
    }
    if incoming.price.is_some() {
        record.price = incoming.price;
    }
    if incoming.started_at.is_some() {
        record.started_at = incoming.started_at;
    }
    if incoming.finished_at.is_some() {
        record.finished_at = incoming.finished_at;
    }
    if record.status.is_terminal() && record.finished_at.is_none() {
        record.finished_at = Some(Utc::now());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
