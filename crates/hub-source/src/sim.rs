//! Simulated frame source
//!
//! Deterministic synthetic frames for demo runs and tests when no real
//! microcontroller link is configured: a blinking left indicator, a slow
//! fuel-level ramp, a wandering coolant reading, and a heartbeat counter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use hub_core::RawFrame;

use crate::source::{FrameSource, SourceConnector, SourceError};

/// Produces a fresh [`SimFrameSource`] on every connect
pub struct SimConnector {
    period: Duration,
}

impl SimConnector {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl SourceConnector for SimConnector {
    async fn connect(&self) -> Result<Box<dyn FrameSource>, SourceError> {
        Ok(Box::new(SimFrameSource {
            period: self.period,
            seq: 0,
        }))
    }
}

/// Synthetic frame generator, one frame per period
pub struct SimFrameSource {
    period: Duration,
    seq: u64,
}

impl SimFrameSource {
    fn build_frame(&self) -> RawFrame {
        let uptime_ms = self.seq * self.period.as_millis() as u64;

        // ~700ms blink cycle on the left indicator
        let blink_on = (uptime_ms / 350) % 2 == 0;

        // Fuel drains over ~2000 frames, coolant oscillates around midscale
        let fuel = 900 - (self.seq % 2000) as i64 * 400 / 2000;
        let coolant = 500 + ((self.seq % 40) as i64 - 20).abs() * 3;

        let mut inputs = HashMap::new();
        inputs.insert("D2".to_string(), blink_on);
        inputs.insert("D4".to_string(), false);

        let mut analog = HashMap::new();
        analog.insert("A0".to_string(), json!(fuel));
        analog.insert("A1".to_string(), json!(coolant));

        RawFrame {
            seq: Some(self.seq),
            uptime_ms: Some(uptime_ms),
            heartbeat: Some(self.seq / 10),
            inputs,
            analog,
        }
    }
}

#[async_trait]
impl FrameSource for SimFrameSource {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        tokio::time::sleep(self.period).await;
        self.seq += 1;
        Ok(Some(self.build_frame()))
    }
}
