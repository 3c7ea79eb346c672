//! HTTP client for the rank-tracking backend.
//!
//! Wraps the backend's read endpoints (jobs, history, analytics, logs,
//! liveness) and the job-creation endpoint using [`reqwest`]. Every
//! request carries the static API key configured in [`config::BackendConfig`].

pub mod api;
pub mod config;
pub mod health;
