//! Vehicle state transformer
//!
//! Owns one stabilizer instance per mapped channel and turns accepted raw
//! frames into complete snapshots. Filter state is populated eagerly from
//! the pin map at construction and mutated only through [`VehicleStateTransformer::ingest`]
//! on the ingestion path; [`VehicleStateTransformer::snapshot`] is a pure
//! read against the filters' current views.

use std::collections::BTreeMap;

use crate::frame::RawFrame;
use crate::mapping::PinMap;
use crate::snapshot::{
    signals, AnalogReading, Health, Indicators, Spares, VehicleStateSnapshot, Warnings,
    SNAPSHOT_TYPE,
};
use crate::stabilize::{Ema, FilterTuning, FlashDetector, HoldLatch, OutlierClamp};
use crate::staleness::StalenessMonitor;

/// Unrounded per-cycle analog result
#[derive(Debug, Clone, Copy)]
struct AnalogCycle {
    raw: i64,
    smooth: f64,
    norm: f64,
}

/// Stateful raw-frame-to-snapshot pipeline
pub struct VehicleStateTransformer {
    pinmap: PinMap,
    stale_after_ms: u64,
    source: String,

    // Per digital signal name
    latches: BTreeMap<String, HoldLatch>,
    flashers: BTreeMap<String, FlashDetector>,

    // Per analog channel name; `cycle` is None when the last accepted frame
    // had no usable sample for the channel
    clamps: BTreeMap<String, OutlierClamp>,
    emas: BTreeMap<String, Ema>,
    cycle: BTreeMap<String, Option<AnalogCycle>>,

    staleness: StalenessMonitor,
    seq: u64,
    uptime_ms: u64,
    heartbeat: u64,
}

impl VehicleStateTransformer {
    pub fn new(
        pinmap: PinMap,
        tuning: &FilterTuning,
        stale_after_ms: u64,
        source: impl Into<String>,
    ) -> Self {
        let mut latches = BTreeMap::new();
        let mut flashers = BTreeMap::new();
        for name in pinmap.digital.values() {
            let indicator = signals::INDICATORS.contains(&name.as_str());
            let hold = if indicator { tuning.indicator_hold_ms } else { 0 };
            latches.insert(name.clone(), HoldLatch::new(tuning.min_stable_ms, hold));
            if indicator {
                flashers.insert(
                    name.clone(),
                    FlashDetector::new(tuning.flash_window_ms, tuning.flash_min_toggles),
                );
            }
        }

        let mut clamps = BTreeMap::new();
        let mut emas = BTreeMap::new();
        let mut cycle = BTreeMap::new();
        for channel in pinmap.analog.values() {
            clamps.insert(channel.name.clone(), OutlierClamp::new(tuning.clamp_max_step));
            emas.insert(channel.name.clone(), Ema::new(tuning.ema_alpha));
            cycle.insert(channel.name.clone(), None);
        }

        Self {
            pinmap,
            stale_after_ms,
            source: source.into(),
            latches,
            flashers,
            clamps,
            emas,
            cycle,
            staleness: StalenessMonitor::new(),
            seq: 0,
            uptime_ms: 0,
            heartbeat: 0,
        }
    }

    /// Consume one accepted frame, advancing every mapped channel's filters.
    pub fn ingest(&mut self, frame: &RawFrame, now_ms: u64) {
        self.staleness.mark(now_ms);

        if let Some(seq) = frame.seq {
            self.seq = seq;
        }
        self.uptime_ms = frame.uptime_ms.unwrap_or(0);
        self.heartbeat = frame.heartbeat.unwrap_or(0);

        for (pin, name) in &self.pinmap.digital {
            // Missing pins read as false; the latch still needs the sample
            // so its timers advance
            let raw = frame.inputs.get(pin).copied().unwrap_or(false);
            let Some(latch) = self.latches.get_mut(name) else {
                continue;
            };
            let stable = latch.update(raw, now_ms);
            if let Some(flasher) = self.flashers.get_mut(name) {
                flasher.update(stable, now_ms);
            }
        }

        for (pin, channel) in &self.pinmap.analog {
            let sample = frame.analog.get(pin).and_then(|v| v.as_f64());
            let entry = match sample {
                Some(raw) => {
                    let (Some(clamp), Some(ema)) = (
                        self.clamps.get_mut(&channel.name),
                        self.emas.get_mut(&channel.name),
                    ) else {
                        continue;
                    };

                    let clamped = clamp.update(raw);
                    let smooth = ema.update(clamped);
                    let norm = channel.normalize(smooth);
                    Some(AnalogCycle {
                        raw: raw as i64,
                        smooth,
                        norm,
                    })
                }
                // Absent or unparsable this cycle: report nulls rather than
                // a stale reading; the channel's filters keep their state
                None => None,
            };
            self.cycle.insert(channel.name.clone(), entry);
        }
    }

    /// Assemble a complete snapshot at `now_ms`.
    ///
    /// Always produces the full fixed schema; unmapped names default to
    /// false (digital) or the null triplet (analog).
    pub fn snapshot(&self, now_ms: u64) -> VehicleStateSnapshot {
        let indicators = Indicators {
            left: self.stable(signals::LEFT_INDICATOR, now_ms),
            right: self.stable(signals::RIGHT_INDICATOR, now_ms),
            left_flashing: self.flashing(signals::LEFT_INDICATOR, now_ms),
            right_flashing: self.flashing(signals::RIGHT_INDICATOR, now_ms),
            high_beam: self.stable(signals::HIGH_BEAM, now_ms),
        };

        let warnings = Warnings {
            brake: self.stable(signals::BRAKE_WARNING, now_ms),
            oil: self.stable(signals::OIL_PRESSURE, now_ms),
            charge: self.stable(signals::CHARGE_LAMP, now_ms),
            door: self.stable(signals::DOOR_AJAR, now_ms),
        };

        let spares = Spares {
            spare_1: self.stable(signals::SPARE_1, now_ms),
        };

        let analog = self
            .cycle
            .iter()
            .map(|(name, entry)| {
                let reading = match entry {
                    Some(c) => AnalogReading {
                        raw: Some(c.raw),
                        smooth: Some(round2(c.smooth)),
                        norm: Some(round4(c.norm)),
                    },
                    None => AnalogReading::default(),
                };
                (name.clone(), reading)
            })
            .collect();

        VehicleStateSnapshot {
            message_type: SNAPSHOT_TYPE,
            ts_ms: now_ms,
            source: self.source.clone(),
            seq: self.seq,
            uptime_ms: self.uptime_ms,
            heartbeat: self.heartbeat,
            indicators,
            warnings,
            spares,
            analog,
            health: Health {
                stale: self.staleness.is_stale(now_ms, self.stale_after_ms),
                last_rx_ms: self.staleness.last_rx_ms(),
            },
        }
    }

    fn stable(&self, name: &str, now_ms: u64) -> bool {
        self.latches
            .get(name)
            .map(|l| l.output(now_ms))
            .unwrap_or(false)
    }

    fn flashing(&self, name: &str, now_ms: u64) -> bool {
        self.flashers
            .get(name)
            .map(|f| f.flashing(now_ms))
            .unwrap_or(false)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
