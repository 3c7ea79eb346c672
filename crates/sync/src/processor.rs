//! Push-channel frame processing loop.
//!
//! Reads raw frames from a live stream connection, parses them into
//! typed [`StreamMessage`]s, and feeds job updates into the shared
//! store. Malformed frames are logged and skipped; they never corrupt
//! the store.

use futures::StreamExt;
use ranktrack_core::store::UpdateOutcome;
use tokio_tungstenite::tungstenite::Message;

use crate::messages::{parse_message, StreamMessage};
use crate::store::SharedJobStore;

/// Process frames until the connection drops.
///
/// Loops until the WebSocket closes, a fatal receive error occurs, or
/// the stream is exhausted. The caller handles reconnection.
pub async fn process_messages(
    ws_stream: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    store: &SharedJobStore,
) {
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_text_frame(&text, store).await;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Binary(_)) => {
                tracing::trace!("Ignoring binary frame on the update stream");
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Update stream closed by the backend");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                tracing::error!(error = %e, "Update stream receive error");
                break;
            }
        }
    }
}

/// Decode one text frame and apply it to the store.
async fn handle_text_frame(text: &str, store: &SharedJobStore) {
    match parse_message(text) {
        Ok(StreamMessage::JobUpdate(update)) => match store.apply_update(&update).await {
            Ok(UpdateOutcome::Merged) => {
                tracing::debug!(
                    job_id = %update.job_id,
                    status = update.status.as_str(),
                    "Merged job update",
                );
            }
            Ok(UpdateOutcome::Inserted) => {
                tracing::info!(
                    job_id = %update.job_id,
                    status = update.status.as_str(),
                    "Discovered job via the update stream",
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, raw_frame = %text, "Rejected job update");
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, raw_frame = %text, "Failed to parse stream frame");
        }
    }
}
