//! Backend connection settings.
//!
//! Loaded once at startup and passed explicitly to every collaborator;
//! core logic never reads the environment.

/// Header carrying the static API key on every backend request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Base URL and credentials for the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// HTTP origin, e.g. `http://host:4000` (no trailing slash).
    pub base_url: String,
    /// Value sent in the [`API_KEY_HEADER`] header.
    pub api_key: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var             | Required | Description                         |
    /// |---------------------|----------|-------------------------------------|
    /// | `RANKTRACK_API_URL` | yes      | Backend origin, e.g. `http://host:4000` |
    /// | `RANKTRACK_API_KEY` | yes      | Static API key                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("RANKTRACK_API_URL")
            .map_err(|_| ConfigError::MissingVar("RANKTRACK_API_URL"))?;
        let api_key = std::env::var("RANKTRACK_API_KEY")
            .map_err(|_| ConfigError::MissingVar("RANKTRACK_API_KEY"))?;
        Ok(Self::new(base_url, api_key))
    }

    /// WebSocket origin derived from the HTTP base URL
    /// (`http` -> `ws`, `https` -> `wss`).
    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
