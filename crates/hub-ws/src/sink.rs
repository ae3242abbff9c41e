//! Subscriber sink seam
//!
//! The broadcast loop only needs "send this text, tell me if the peer is
//! gone". Keeping that behind a trait lets the loop run against a real
//! WebSocket or a test double.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use thiserror::Error;

/// A subscriber write failed; the peer is treated as gone.
#[derive(Debug, Error)]
#[error("subscriber send failed: {0}")]
pub struct SinkError(pub String);

/// Outbound half of one subscriber connection
#[async_trait]
pub trait SnapshotSink: Send {
    async fn send_text(&mut self, text: String) -> Result<(), SinkError>;
}

#[async_trait]
impl SnapshotSink for WebSocket {
    async fn send_text(&mut self, text: String) -> Result<(), SinkError> {
        self.send(Message::Text(text.into()))
            .await
            .map_err(|e| SinkError(e.to_string()))
    }
}
