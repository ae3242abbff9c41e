//! Frame ingestion loop
//!
//! Runs for the life of the process: acquire the source, pump frames into
//! the transformer, and on link loss retry acquisition with exponential
//! backoff (doubling from `initial_ms`, capped at `max_ms`, reset on a
//! successful connect). Nothing here terminates the process; a silent or
//! flapping source only ever shows up downstream as staleness.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};

use hub_core::{now_ms, VehicleStateTransformer};

use crate::config::BackoffConfig;
use crate::source::SourceConnector;

/// Drive the connector/source forever, feeding the transformer.
///
/// The transformer mutex is the single-writer seam: only this loop calls
/// `ingest`; the recompute pump takes the lock briefly to read a snapshot.
pub async fn run_ingest(
    connector: Arc<dyn SourceConnector>,
    transformer: Arc<Mutex<VehicleStateTransformer>>,
    backoff: BackoffConfig,
) {
    let initial = Duration::from_millis(backoff.initial_ms);
    let max = Duration::from_millis(backoff.max_ms.max(backoff.initial_ms));
    let mut delay = initial;

    loop {
        match connector.connect().await {
            Ok(mut source) => {
                info!("frame source acquired");
                delay = initial;

                loop {
                    match source.next_frame().await {
                        Ok(Some(frame)) => {
                            transformer.lock().ingest(&frame, now_ms());
                        }
                        // Timeout or discarded line: poll again
                        Ok(None) => {}
                        Err(e) => {
                            warn!(error = %e, "frame source lost, reacquiring");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "frame source connect failed");
            }
        }

        sleep(delay).await;
        delay = (delay * 2).min(max);
    }
}
