//! Frame source traits and errors

use async_trait::async_trait;
use thiserror::Error;

use hub_core::RawFrame;

/// Errors from the frame source link
#[derive(Debug, Error)]
pub enum SourceError {
    /// Could not open the source
    #[error("failed to connect to frame source {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Source closed from the far side
    #[error("frame source disconnected")]
    Disconnected,

    /// Read error on an open source
    #[error("frame source read error: {0}")]
    Io(#[from] std::io::Error),
}

/// An open link yielding parsed input frames.
///
/// `Ok(None)` means "nothing usable this round" - a read timeout or a
/// discarded line - and the caller simply polls again. `Err` means the
/// link is gone and must be re-acquired.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError>;
}

/// Acquires a [`FrameSource`]; retried with backoff by the ingestion loop.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn FrameSource>, SourceError>;
}
