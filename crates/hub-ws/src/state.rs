//! Application state shared across handlers

use std::time::Duration;

use hub_core::SnapshotSlot;

/// Shared state for the broadcast surface
#[derive(Clone)]
pub struct AppState {
    /// The published-snapshot slot (written by the pump, read here)
    pub slot: SnapshotSlot,
    /// Service name sent in the hello handshake
    pub service: String,
    /// Source id sent in the hello handshake
    pub source: String,
    /// Per-subscriber republish period
    pub broadcast_interval: Duration,
}

impl AppState {
    pub fn new(
        slot: SnapshotSlot,
        service: impl Into<String>,
        source: impl Into<String>,
        broadcast_interval: Duration,
    ) -> Self {
        Self {
            slot,
            service: service.into(),
            source: source.into(),
            broadcast_interval,
        }
    }
}
