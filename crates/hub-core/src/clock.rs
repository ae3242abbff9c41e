//! Monotonic process clock
//!
//! All published timestamps (`ts_ms`, `last_rx_ms`) and filter timers share
//! this base: milliseconds since the first call in this process. Pipeline
//! operations take an explicit `now_ms` argument so tests control time;
//! tasks read this clock at their call sites.

use std::sync::OnceLock;
use std::time::Instant;

static START: OnceLock<Instant> = OnceLock::new();

/// Milliseconds elapsed since process start (monotonic, never decreases).
pub fn now_ms() -> u64 {
    START.get_or_init(Instant::now).elapsed().as_millis() as u64
}
