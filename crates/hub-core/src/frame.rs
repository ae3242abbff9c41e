//! Inbound raw frame model
//!
//! One newline-delimited JSON message from the microcontroller:
//!
//! ```json
//! { "type": "vehicle_inputs", "seq": 17, "uptime_ms": 4200, "heartbeat": 9,
//!   "inputs": { "D2": true }, "analog": { "A0": 512 } }
//! ```
//!
//! Every field beyond the type tag is optional; downstream code always
//! applies an explicit default instead of assuming presence. Analog values
//! stay as raw JSON values so one malformed sample degrades only its own
//! channel.

use std::collections::HashMap;

use serde::Deserialize;

/// Type tag of frames the pipeline accepts
pub const FRAME_TYPE_VEHICLE_INPUTS: &str = "vehicle_inputs";

/// A parsed point-in-time input frame from the Frame Source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFrame {
    /// Source-side sequence number
    pub seq: Option<u64>,
    /// Source-side uptime
    pub uptime_ms: Option<u64>,
    /// Source-side liveness counter
    pub heartbeat: Option<u64>,
    /// Digital pin readings; pins may be omitted
    #[serde(default)]
    pub inputs: HashMap<String, bool>,
    /// Analog pin readings; pins may be omitted or malformed
    #[serde(default)]
    pub analog: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TaggedFrame {
    #[serde(rename = "type")]
    frame_type: String,
    #[serde(flatten)]
    frame: RawFrame,
}

/// Decode one line from the Frame Source.
///
/// Returns `None` for anything that is not a well-formed `vehicle_inputs`
/// frame: junk bytes, other message types, missing type tag. Discards are
/// silent by contract; the source link is expected to be noisy.
pub fn decode_frame(line: &str) -> Option<RawFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let tagged: TaggedFrame = serde_json::from_str(line).ok()?;
    if tagged.frame_type != FRAME_TYPE_VEHICLE_INPUTS {
        return None;
    }
    Some(tagged.frame)
}
