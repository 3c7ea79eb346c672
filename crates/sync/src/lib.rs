//! Live session layer for the rank-tracking dashboard.
//!
//! Owns the observable job store, the push-channel connection with its
//! reconnection policy, the health monitor, and the per-job log tailer,
//! all wired together by [`session::DashboardSession`] on a single
//! tokio runtime with explicit cancellation on teardown.

pub mod client;
pub mod events;
pub mod health;
pub mod messages;
pub mod processor;
pub mod reconnect;
pub mod session;
pub mod store;
pub mod tailer;
