//! REST client for the backend's job endpoints.
//!
//! Wraps the backend HTTP API (job snapshots, execution history,
//! analytics, per-job logs, liveness, job creation) using [`reqwest`].
//! Read failures leave the caller's current view untouched -- stale
//! data is preferred over blanking the dashboard.

use ranktrack_core::analytics::JobAnalytics;
use ranktrack_core::job::JobRecord;
use ranktrack_core::search::SearchRequest;
use serde::de::DeserializeOwned;

use crate::config::{BackendConfig, API_KEY_HEADER};
use crate::health::{HealthResponse, HealthState};

/// HTTP client for one backend origin.
pub struct BackendApi {
    client: reqwest::Client,
    config: BackendConfig,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendApi {
    /// Create a new API client for a backend.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across collaborators).
    pub fn with_client(client: reqwest::Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Pull the full job snapshot.
    ///
    /// Sends a `GET /api/jobs` request and returns the records in the
    /// order the backend lists them.
    pub async fn fetch_jobs(&self) -> Result<Vec<JobRecord>, ApiError> {
        self.get_json("/api/jobs").await
    }

    /// Pull the execution history, including terminal/historical entries.
    ///
    /// Sends a `GET /api/jobs/history` request. History is a read-only
    /// side channel; it is not merged into the live job store.
    pub async fn fetch_history(&self) -> Result<Vec<JobRecord>, ApiError> {
        self.get_json("/api/jobs/history").await
    }

    /// Fetch the backend's authoritative aggregate counters.
    ///
    /// Sends a `GET /api/jobs/analytics` request.
    pub async fn fetch_analytics(&self) -> Result<JobAnalytics, ApiError> {
        self.get_json("/api/jobs/analytics").await
    }

    /// Fetch the complete log lines known for one job.
    ///
    /// Sends a `GET /api/jobs/{id}/logs` request.
    pub async fn fetch_logs(&self, job_id: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(&format!("/api/jobs/{job_id}/logs")).await
    }

    /// Submit a rank-tracking search, creating one or more jobs.
    ///
    /// Sends a `POST /api/amazon/search` request. Fire-and-forget: the
    /// created jobs surface through the next snapshot pull, not through
    /// this response.
    pub async fn submit_search(&self, request: &SearchRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/api/amazon/search", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Probe the backend liveness endpoint.
    ///
    /// Sends a `GET /health` request and reduces the outcome to a
    /// [`HealthState`]: any non-`"ok"` payload, non-success status, or
    /// transport failure is `Unhealthy`. Failures are the monitored
    /// signal here, so they are logged rather than propagated.
    pub async fn check_health(&self) -> HealthState {
        let result: Result<HealthResponse, ApiError> = self.get_json("/health").await;
        match result {
            Ok(response) => response.state(),
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                HealthState::Unhealthy
            }
        }
    }

    // ---- private helpers ----

    /// Issue a GET request and decode the JSON body.
    ///
    /// The body is read as text first so that transport, status, and
    /// decode failures stay distinguishable.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
