//! Aggregate counters derived from the job collection.
//!
//! [`project`] is a pure function of the store's current contents; the
//! same shape is also returned by the backend's analytics endpoint when
//! an authoritative aggregate is preferred over local derivation.

use serde::{Deserialize, Serialize};

use crate::job::{JobRecord, JobStatus};

/// Aggregate job counters plus the success rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalytics {
    pub total: u64,
    pub completed: u64,
    pub running: u64,
    pub failed: u64,
    /// The backend analytics endpoint omits this counter; only the
    /// local projection fills it.
    #[serde(default)]
    pub waiting: u64,
    pub success_rate: f64,
}

/// Derive [`JobAnalytics`] from the current records.
///
/// `success_rate` is `completed / (completed + failed)`, or `0.0` when
/// no job has finished yet.
pub fn project(records: &[JobRecord]) -> JobAnalytics {
    let mut completed = 0u64;
    let mut running = 0u64;
    let mut failed = 0u64;
    let mut waiting = 0u64;

    for record in records {
        match record.status {
            JobStatus::Waiting => waiting += 1,
            JobStatus::Running => running += 1,
            JobStatus::Completed => completed += 1,
            JobStatus::Failed => failed += 1,
        }
    }

    let finished = completed + failed;
    let success_rate = if finished > 0 {
        completed as f64 / finished as f64
    } else {
        0.0
    };

    JobAnalytics {
        total: records.len() as u64,
        completed,
        running,
        failed,
        waiting,
        success_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
