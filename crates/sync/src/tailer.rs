//! Per-job log view.
//!
//! [`LogTailer`] holds the log lines for one selected job. Changing the
//! selection discards the prior lines before fetching; re-selecting the
//! same job refetches the complete content. There is no incremental
//! tailing protocol -- each fetch returns everything the backend knows
//! at that instant.

use std::sync::Arc;

use ranktrack_client::api::{ApiError, BackendApi};
use ranktrack_core::types::JobId;

/// Rough classification of a log line by the backend's marker strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLineKind {
    Error,
    Success,
    Started,
    Info,
}

/// Classify a log line so consumers can style it without re-parsing.
pub fn classify_line(line: &str) -> LogLineKind {
    if line.contains("ERROR") {
        LogLineKind::Error
    } else if line.contains("SUCCESS") {
        LogLineKind::Success
    } else if line.contains("STARTED") {
        LogLineKind::Started
    } else {
        LogLineKind::Info
    }
}

/// Restartable log view for one selected job.
pub struct LogTailer {
    api: Arc<BackendApi>,
    selection: Option<JobId>,
    lines: Vec<String>,
}

impl LogTailer {
    pub fn new(api: Arc<BackendApi>) -> Self {
        Self {
            api,
            selection: None,
            lines: Vec::new(),
        }
    }

    /// The currently selected job id, if any.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// The lines fetched for the current selection.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Select a job and fetch its full log content.
    ///
    /// A selection change discards the previous lines even if the fetch
    /// then fails; refreshing an unchanged selection keeps the previous
    /// lines on failure (stale-but-available).
    pub async fn select(&mut self, job_id: &str) -> Result<&[String], ApiError> {
        self.retarget(job_id);
        let lines = self.api.fetch_logs(job_id).await?;
        self.lines = lines;
        Ok(&self.lines)
    }

    /// Clear the selection and its lines.
    pub fn clear(&mut self) {
        self.selection = None;
        self.lines.clear();
    }

    /// Point the view at `job_id`, discarding stale lines on change.
    /// Returns whether the selection actually changed.
    fn retarget(&mut self, job_id: &str) -> bool {
        if self.selection.as_deref() == Some(job_id) {
            return false;
        }
        self.selection = Some(job_id.to_string());
        self.lines.clear();
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ranktrack_client::config::BackendConfig;

    fn tailer() -> LogTailer {
        LogTailer::new(Arc::new(BackendApi::new(BackendConfig::new(
            "http://127.0.0.1:9",
            "key",
        ))))
    }

    #[test]
    fn classifies_by_marker_substrings() {
        assert_eq!(classify_line("[12:00] ERROR proxy timed out"), LogLineKind::Error);
        assert_eq!(classify_line("[12:01] SUCCESS rank found"), LogLineKind::Success);
        assert_eq!(classify_line("[12:02] STARTED job 42"), LogLineKind::Started);
        assert_eq!(classify_line("[12:03] visiting page 3"), LogLineKind::Info);
    }

    #[test]
    fn retarget_discards_lines_only_on_change() {
        let mut view = tailer();
        view.selection = Some("1".into());
        view.lines = vec!["old line".into()];

        assert!(!view.retarget("1"));
        assert_eq!(view.lines.len(), 1);

        assert!(view.retarget("2"));
        assert!(view.lines.is_empty());
        assert_eq!(view.selection(), Some("2"));
    }

    #[tokio::test]
    async fn failed_fetch_after_selection_change_leaves_no_stale_lines() {
        let mut view = tailer();
        view.selection = Some("1".into());
        view.lines = vec!["old line".into()];

        // The backend is unreachable, so the fetch fails -- but the
        // prior job's lines must already be gone.
        let result = view.select("2").await;
        assert!(result.is_err());
        assert!(view.lines().is_empty());
        assert_eq!(view.selection(), Some("2"));
    }

    #[test]
    fn clear_resets_the_view() {
        let mut view = tailer();
        view.selection = Some("1".into());
        view.lines = vec!["line".into()];

        view.clear();
        assert!(view.selection().is_none());
        assert!(view.lines().is_empty());
    }
}
