//! Backend liveness tri-state.

use serde::{Deserialize, Serialize};

/// Reduced result of polling `GET /health`.
///
/// `Unknown` only ever appears before the first poll resolves; after
/// that the monitor reports `Healthy` or `Unhealthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Unknown,
    Healthy,
    Unhealthy,
}

impl HealthState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Wire shape of the liveness endpoint.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// `"ok"` is healthy; anything else is not.
    pub fn state(&self) -> HealthState {
        if self.status == "ok" {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
