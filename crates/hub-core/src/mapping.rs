//! Pin-to-signal mapping config
//!
//! Loaded once at startup, read-only for the process lifetime. Digital pins
//! map to signal names; analog pins carry a name plus the range used for
//! normalization.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;

/// Configuration for one analog input channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalogChannel {
    /// Signal name published in the snapshot's analog map
    pub name: String,
    /// Raw ADC value mapped to 0.0
    #[serde(default)]
    pub min: i64,
    /// Raw ADC value mapped to 1.0
    #[serde(default = "default_max")]
    pub max: i64,
    /// Flip the normalized value (senders that read high when empty)
    #[serde(default)]
    pub invert: bool,
}

fn default_max() -> i64 {
    1023
}

impl AnalogChannel {
    /// Normalize a smoothed sample into [0, 1] against this channel's range.
    ///
    /// Out-of-range inputs are clamped first; `invert` flips the result.
    /// A misconfigured range (`max <= min`) degenerates to 0.0 rather than
    /// failing.
    pub fn normalize(&self, x: f64) -> f64 {
        let lo = self.min as f64;
        let hi = self.max as f64;
        if hi <= lo {
            return 0.0;
        }

        let x = x.clamp(lo, hi);
        let mut n = (x - lo) / (hi - lo);
        if self.invert {
            n = 1.0 - n;
        }
        n.clamp(0.0, 1.0)
    }
}

/// Immutable pin-to-signal mapping
///
/// BTreeMaps keep iteration (and therefore snapshot field population and
/// serialized output) in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinMap {
    /// Digital pin id (e.g. "D2") -> signal name (e.g. "left_indicator")
    #[serde(default)]
    pub digital: BTreeMap<String, String>,
    /// Analog pin id (e.g. "A0") -> channel config
    #[serde(default)]
    pub analog: BTreeMap<String, AnalogChannel>,
}

impl PinMap {
    /// Load a pin map from a JSON file.
    ///
    /// This is the sole fatal-at-startup path: an unreadable or malformed
    /// file (or a duplicate digital signal name) is returned as an error
    /// for the caller to abort on.
    pub fn load(path: impl AsRef<Path>) -> Result<PinMap, MappingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let map: PinMap = serde_json::from_str(&text).map_err(|source| MappingError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        map.validate()?;
        Ok(map)
    }

    /// The stock harness mapping used when no pin map file is configured.
    pub fn stock() -> PinMap {
        let digital = [
            ("D2", "left_indicator"),
            ("D3", "right_indicator"),
            ("D4", "high_beam"),
            ("D5", "brake_warning"),
            ("D6", "oil_pressure"),
            ("D7", "charge_lamp"),
            ("D8", "door_ajar"),
            ("D9", "spare_1"),
        ]
        .into_iter()
        .map(|(pin, name)| (pin.to_string(), name.to_string()))
        .collect();

        let analog = [
            ("A0", "fuel_sender_raw"),
            ("A1", "coolant_sender_raw"),
            ("A2", "aux_analog_2"),
            ("A3", "aux_analog_3"),
            ("A4", "aux_analog_4"),
            ("A5", "aux_analog_5"),
        ]
        .into_iter()
        .map(|(pin, name)| {
            (
                pin.to_string(),
                AnalogChannel {
                    name: name.to_string(),
                    min: 0,
                    max: 1023,
                    invert: false,
                },
            )
        })
        .collect();

        PinMap { digital, analog }
    }

    fn validate(&self) -> Result<(), MappingError> {
        let mut seen = HashSet::new();
        for name in self.digital.values() {
            if !seen.insert(name.as_str()) {
                return Err(MappingError::DuplicateSignal(name.clone()));
            }
        }
        Ok(())
    }
}
