//! Published vehicle state model
//!
//! The outbound `vehicle_state` message. The schema is fixed: every key is
//! present in every published snapshot regardless of upstream completeness,
//! so consumers never hit a missing field. A snapshot is immutable once
//! built and replaced wholesale on each recomputation.

use std::collections::BTreeMap;

use serde::Serialize;

/// Type tag on every published snapshot
pub const SNAPSHOT_TYPE: &str = "vehicle_state";

/// Well-known digital signal names
pub mod signals {
    pub const LEFT_INDICATOR: &str = "left_indicator";
    pub const RIGHT_INDICATOR: &str = "right_indicator";
    pub const HIGH_BEAM: &str = "high_beam";
    pub const BRAKE_WARNING: &str = "brake_warning";
    pub const OIL_PRESSURE: &str = "oil_pressure";
    pub const CHARGE_LAMP: &str = "charge_lamp";
    pub const DOOR_AJAR: &str = "door_ajar";
    pub const SPARE_1: &str = "spare_1";

    /// Signals that get hold-on masking and flash tracking
    pub const INDICATORS: [&str; 2] = [LEFT_INDICATOR, RIGHT_INDICATOR];
}

/// Turn indicator state, stabilized and flash-classified
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Indicators {
    pub left: bool,
    pub right: bool,
    pub left_flashing: bool,
    pub right_flashing: bool,
    pub high_beam: bool,
}

/// Dashboard warning lamps
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Warnings {
    pub brake: bool,
    pub oil: bool,
    pub charge: bool,
    pub door: bool,
}

/// Unassigned digital inputs kept in the schema for wiring headroom
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Spares {
    pub spare_1: bool,
}

/// One analog channel's readings for the current cycle.
///
/// All three fields are null together: either the channel produced a
/// usable sample this cycle, or it reports nothing rather than stale data.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AnalogReading {
    pub raw: Option<i64>,
    pub smooth: Option<f64>,
    pub norm: Option<f64>,
}

/// Link health as seen by consumers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Health {
    pub stale: bool,
    pub last_rx_ms: Option<u64>,
}

/// The complete published vehicle state
#[derive(Debug, Clone, Serialize)]
pub struct VehicleStateSnapshot {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub ts_ms: u64,
    pub source: String,
    pub seq: u64,
    pub uptime_ms: u64,
    pub heartbeat: u64,
    pub indicators: Indicators,
    pub warnings: Warnings,
    pub spares: Spares,
    /// One entry per mapped analog channel, keyed by signal name
    pub analog: BTreeMap<String, AnalogReading>,
    #[serde(rename = "_health")]
    pub health: Health,
}

/// Handshake sent once to each new subscriber, before any snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Hello {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub service: String,
    pub source: String,
    pub ts_ms: u64,
}

impl Hello {
    pub fn new(service: impl Into<String>, source: impl Into<String>, ts_ms: u64) -> Self {
        Self {
            message_type: "hello",
            service: service.into(),
            source: source.into(),
            ts_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_fixed_keys() {
        let mut analog = BTreeMap::new();
        analog.insert("fuel_sender_raw".to_string(), AnalogReading::default());

        let snap = VehicleStateSnapshot {
            message_type: SNAPSHOT_TYPE,
            ts_ms: 42,
            source: "vehicle_hub".to_string(),
            seq: 7,
            uptime_ms: 1000,
            heartbeat: 3,
            indicators: Indicators::default(),
            warnings: Warnings::default(),
            spares: Spares::default(),
            analog,
            health: Health {
                stale: true,
                last_rx_ms: None,
            },
        };

        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["type"], "vehicle_state");
        for key in [
            "ts_ms",
            "source",
            "seq",
            "uptime_ms",
            "heartbeat",
            "indicators",
            "warnings",
            "spares",
            "analog",
            "_health",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        // Null triplet is emitted, not omitted
        assert!(value["analog"]["fuel_sender_raw"]["raw"].is_null());
        assert!(value["analog"]["fuel_sender_raw"]["smooth"].is_null());
        assert!(value["analog"]["fuel_sender_raw"]["norm"].is_null());
        assert!(value["_health"]["last_rx_ms"].is_null());
    }

    #[test]
    fn test_hello_message_shape() {
        let hello = Hello::new("vehicle_hub", "vehicle_hub", 12);
        let value = serde_json::to_value(&hello).unwrap();
        assert_eq!(value["type"], "hello");
        assert_eq!(value["service"], "vehicle_hub");
        assert_eq!(value["ts_ms"], 12);
    }
}
