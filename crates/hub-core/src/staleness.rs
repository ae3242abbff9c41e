//! Frame staleness tracking

/// Tracks the time of the last accepted frame.
///
/// Marked as a side effect of frame acceptance and read independently by
/// snapshot assembly; it cannot block or fail.
#[derive(Debug, Clone, Default)]
pub struct StalenessMonitor {
    last_rx_ms: Option<u64>,
}

impl StalenessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a frame was accepted at `now_ms`.
    pub fn mark(&mut self, now_ms: u64) {
        self.last_rx_ms = Some(now_ms);
    }

    /// Time of the last accepted frame, if any.
    pub fn last_rx_ms(&self) -> Option<u64> {
        self.last_rx_ms
    }

    /// Stale when nothing was ever received, or the last frame is older
    /// than `stale_after_ms`.
    pub fn is_stale(&self, now_ms: u64, stale_after_ms: u64) -> bool {
        match self.last_rx_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > stale_after_ms,
        }
    }
}
