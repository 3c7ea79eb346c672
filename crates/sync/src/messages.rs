//! Push-channel message envelope and parser.
//!
//! The backend sends JSON text frames shaped
//! `{"event": "<name>", "data": {...}}`. This module deserializes them
//! into a strongly-typed [`StreamMessage`] enum.

use ranktrack_core::job::JobUpdate;
use serde::Deserialize;

/// All known push-channel message types.
///
/// Deserialized via the internally-tagged `"event"` field with
/// associated `"data"` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum StreamMessage {
    /// A partial update to one job record.
    #[serde(rename = "jobUpdate")]
    JobUpdate(JobUpdate),
}

/// Parse a push-channel text frame into a typed message.
///
/// Returns `Err` for malformed JSON, unknown `event` values, or
/// payloads missing required fields (notably `jobId`). Callers should
/// log the frame and continue -- a bad frame must never corrupt the
/// store.
pub fn parse_message(text: &str) -> Result<StreamMessage, serde_json::Error> {
    serde_json::from_str(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
