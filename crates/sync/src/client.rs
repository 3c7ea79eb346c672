//! WebSocket client for the backend's job-update push channel.
//!
//! [`StreamClient`] holds the connection configuration; call
//! [`StreamClient::connect`] to establish a live [`StreamConnection`].
//! The channel only pushes -- nothing is written back after the
//! handshake.

use ranktrack_client::config::BackendConfig;
use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Path of the push channel on the backend origin.
const STREAM_PATH: &str = "/ws/jobs";

/// Configuration handle for the push channel.
pub struct StreamClient {
    ws_url: String,
}

/// A live push-channel connection.
pub struct StreamConnection {
    /// Unique client ID sent during the handshake, so the backend can
    /// address this session.
    pub client_id: String,
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl StreamClient {
    /// Create a client targeting the backend described by `config`.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            ws_url: format!("{}{STREAM_PATH}", config.ws_url()),
        }
    }

    /// WebSocket endpoint URL (without the handshake query string).
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the push channel.
    ///
    /// Generates a unique `clientId` (UUID v4) and appends it as a
    /// query parameter.
    pub async fn connect(&self) -> Result<StreamConnection, StreamError> {
        let client_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}?clientId={}", self.ws_url, client_id);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            StreamError::Connection(format!(
                "Failed to connect to the update stream at {}: {e}",
                self.ws_url
            ))
        })?;

        tracing::info!(client_id = %client_id, "Connected to the update stream at {}", self.ws_url);

        Ok(StreamConnection {
            client_id,
            ws_stream,
        })
    }
}

/// Errors from the push-channel client.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
