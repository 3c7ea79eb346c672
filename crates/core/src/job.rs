//! Job record and status types shared across the dashboard core.
//!
//! Wire shapes match the backend JSON: camelCase field names, lowercase
//! status values, RFC 3339 timestamps. `targetASIN` keeps the backend's
//! all-caps suffix.

use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp};

/// Lifecycle status of a job execution.
///
/// Transitions follow `waiting -> running -> {completed, failed}` and
/// are monotonic: once a job is terminal its status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Waiting,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (`completed` or `failed`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Position in the lifecycle ordering. Both terminal states share
    /// the top rank so neither can replace the other.
    fn rank(self) -> u8 {
        match self {
            Self::Waiting => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed => 2,
        }
    }

    /// Whether a merge is allowed to move a record from `self` to `next`.
    ///
    /// Only strictly-forward transitions are allowed; an incoming status
    /// at or behind the current rank is ignored by the store (the rest
    /// of the event still merges).
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        next.rank() > self.rank()
    }

    /// The lowercase wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One job execution as seen by the dashboard.
///
/// A record created from an update event carries only `id` and `status`
/// (plus any result fields present in the event); the descriptive
/// fields are backfilled by a later snapshot and never change once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "targetASIN")]
    pub target_asin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,
}

impl JobRecord {
    /// Create a minimal record with only an id and a status.
    pub fn new(id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
            product_name: None,
            target_asin: None,
            rank_position: None,
            price: None,
            started_at: None,
            finished_at: None,
        }
    }
}

/// Incremental update pushed by the backend for a single job.
///
/// Fields absent from the payload are left unchanged on the record
/// (sparse merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_lowercase_wire_values() {
        for (status, wire) in [
            (JobStatus::Waiting, "\"waiting\""),
            (JobStatus::Running, "\"running\""),
            (JobStatus::Completed, "\"completed\""),
            (JobStatus::Failed, "\"failed\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            let parsed: JobStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<JobStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(JobStatus::Waiting.can_advance_to(JobStatus::Running));
        assert!(JobStatus::Waiting.can_advance_to(JobStatus::Completed));
        assert!(JobStatus::Running.can_advance_to(JobStatus::Completed));
        assert!(JobStatus::Running.can_advance_to(JobStatus::Failed));
    }

    #[test]
    fn backward_and_lateral_transitions_are_rejected() {
        assert!(!JobStatus::Running.can_advance_to(JobStatus::Waiting));
        assert!(!JobStatus::Completed.can_advance_to(JobStatus::Running));
        assert!(!JobStatus::Completed.can_advance_to(JobStatus::Waiting));
        assert!(!JobStatus::Failed.can_advance_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_advance_to(JobStatus::Failed));
        assert!(!JobStatus::Waiting.can_advance_to(JobStatus::Waiting));
    }

    #[test]
    fn record_deserializes_backend_json() {
        let json = r#"{
            "id": "job-42",
            "status": "completed",
            "productName": "dish drying mat",
            "targetASIN": "B0GLH9JBDP",
            "rankPosition": 5,
            "price": "$12.99",
            "finishedAt": "2026-02-16T09:01:00Z"
        }"#;
        let record: JobRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "job-42");
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.product_name.as_deref(), Some("dish drying mat"));
        assert_eq!(record.target_asin.as_deref(), Some("B0GLH9JBDP"));
        assert_eq!(record.rank_position, Some(5));
        assert_eq!(record.price.as_deref(), Some("$12.99"));
        assert!(record.started_at.is_none());
        assert!(record.finished_at.is_some());
    }

    #[test]
    fn record_with_only_required_fields() {
        let record: JobRecord =
            serde_json::from_str(r#"{"id":"1","status":"waiting"}"#).unwrap();
        assert_eq!(record, JobRecord::new("1", JobStatus::Waiting));
    }

    #[test]
    fn record_serializes_with_camel_case_names() {
        let mut record = JobRecord::new("7", JobStatus::Running);
        record.product_name = Some("gaming mouse".into());
        record.target_asin = Some("B08XYZ1234".into());
        record.rank_position = Some(12);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["productName"], "gaming mouse");
        assert_eq!(value["targetASIN"], "B08XYZ1234");
        assert_eq!(value["rankPosition"], 12);
        // Unset options are omitted entirely.
        assert!(value.get("price").is_none());
        assert!(value.get("finishedAt").is_none());
    }

    #[test]
    fn update_deserializes_with_optional_result_fields() {
        let update: JobUpdate =
            serde_json::from_str(r#"{"jobId":"9","status":"running"}"#).unwrap();
        assert_eq!(update.job_id, "9");
        assert_eq!(update.status, JobStatus::Running);
        assert!(update.rank_position.is_none());
        assert!(update.price.is_none());
    }

    #[test]
    fn update_without_job_id_is_rejected() {
        assert!(serde_json::from_str::<JobUpdate>(r#"{"status":"running"}"#).is_err());
    }
}
