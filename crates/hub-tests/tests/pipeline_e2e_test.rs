//! End-to-end pipeline tests: frame lines in, snapshots out
//!
//! Run with: cargo test -p hub-tests --test pipeline_e2e_test

use pretty_assertions::assert_eq;
use serde_json::json;

use hub_core::{
    decode_frame, AnalogChannel, FilterTuning, PinMap, RawFrame, VehicleStateTransformer,
};

const STALE_AFTER_MS: u64 = 750;

fn transformer() -> VehicleStateTransformer {
    VehicleStateTransformer::new(
        PinMap::stock(),
        &FilterTuning::default(),
        STALE_AFTER_MS,
        "vehicle_hub",
    )
}

fn frame_line(d2: bool, a0: i64, seq: u64) -> String {
    json!({
        "type": "vehicle_inputs",
        "seq": seq,
        "uptime_ms": seq * 10,
        "heartbeat": seq / 10,
        "inputs": { "D2": d2 },
        "analog": { "A0": a0 },
    })
    .to_string()
}

/// The full fixed key set, as a consumer would check it.
fn assert_schema_complete(value: &serde_json::Value) {
    assert_eq!(value["type"], "vehicle_state");
    assert!(value["ts_ms"].is_u64());
    assert!(value["source"].is_string());
    assert!(value["seq"].is_u64());
    assert!(value["uptime_ms"].is_u64());
    assert!(value["heartbeat"].is_u64());

    for key in ["left", "right", "left_flashing", "right_flashing", "high_beam"] {
        assert!(value["indicators"][key].is_boolean(), "indicators.{key}");
    }
    for key in ["brake", "oil", "charge", "door"] {
        assert!(value["warnings"][key].is_boolean(), "warnings.{key}");
    }
    assert!(value["spares"]["spare_1"].is_boolean());

    let analog = value["analog"].as_object().unwrap();
    assert_eq!(analog.len(), 6);
    for (name, entry) in analog {
        for field in ["raw", "smooth", "norm"] {
            assert!(
                entry.get(field).is_some(),
                "analog.{name}.{field} must be present (may be null)"
            );
        }
    }

    assert!(value["_health"]["stale"].is_boolean());
    assert!(value["_health"].get("last_rx_ms").is_some());
}

#[test]
fn test_snapshot_schema_complete_with_no_frames() {
    let t = transformer();
    let value = serde_json::to_value(t.snapshot(0)).unwrap();
    assert_schema_complete(&value);
    assert_eq!(value["_health"]["stale"], true);
    assert_eq!(value["_health"]["last_rx_ms"], serde_json::Value::Null);
}

#[test]
fn test_snapshot_schema_complete_for_any_frame_sequence() {
    let mut t = transformer();
    let lines = [
        r#"{"type":"vehicle_inputs","seq":1}"#.to_string(),
        frame_line(true, 500, 2),
        r#"{"type":"vehicle_inputs","inputs":{"D9":true},"analog":{"A3":"bad"}}"#.to_string(),
        frame_line(false, 700, 4),
    ];

    let mut now = 0;
    for line in &lines {
        if let Some(frame) = decode_frame(line) {
            t.ingest(&frame, now);
        }
        now += 50;
        let value = serde_json::to_value(t.snapshot(now)).unwrap();
        assert_schema_complete(&value);
    }
}

#[test]
fn test_garbage_lines_do_not_disturb_state() {
    let mut t = transformer();
    t.ingest(&decode_frame(&frame_line(false, 500, 1)).unwrap(), 0);

    for line in ["junk", "{\"type\":\"boot_banner\"}", ""] {
        assert!(decode_frame(line).is_none());
    }

    let snap = t.snapshot(10);
    assert_eq!(snap.seq, 1);
    assert_eq!(snap.analog["fuel_sender_raw"].raw, Some(500));
}

/// Blinking left indicator: debounced value follows the blink, the flash
/// classifier reports flashing while toggles are fresh and settles once
/// they age out of the window.
#[test]
fn test_left_indicator_blink_scenario() {
    let mut t = transformer();
    let mut seq = 0;
    let mut send = |t: &mut VehicleStateTransformer, d2: bool, now: u64| {
        seq += 1;
        t.ingest(&decode_frame(&frame_line(d2, 512, seq)).unwrap(), now);
    };

    // ON burst: frames every 10ms from t=0 to t=90
    for now in (0..=90).step_by(10) {
        send(&mut t, true, now);
    }
    // OFF phase t=100..240
    for now in (100..=240).step_by(10) {
        send(&mut t, false, now);
    }
    // Back ON, held through t=550
    for now in (250..=550).step_by(10) {
        send(&mut t, true, now);
    }

    // Stable toggles: ON at 30, OFF visible at 130, ON at 280 - three
    // toggles well inside the 1200ms window
    let mid = t.snapshot(560);
    assert!(mid.indicators.left);
    assert!(mid.indicators.left_flashing);
    assert!(!mid.indicators.right_flashing);

    // No further toggles: the window drains and flashing settles false
    // while the stable value stays ON
    let settled = t.snapshot(1700);
    assert!(settled.indicators.left);
    assert!(!settled.indicators.left_flashing);
}

/// A sub-min-stable glitch never reaches the stable value.
#[test]
fn test_debounce_suppresses_glitch_end_to_end() {
    let mut t = transformer();
    t.ingest(&decode_frame(&frame_line(false, 512, 1)).unwrap(), 0);
    t.ingest(&decode_frame(&frame_line(true, 512, 2)).unwrap(), 10);
    t.ingest(&decode_frame(&frame_line(false, 512, 3)).unwrap(), 25);
    t.ingest(&decode_frame(&frame_line(false, 512, 4)).unwrap(), 100);

    assert!(!t.snapshot(100).indicators.left);
}

#[test]
fn test_analog_spike_and_smoothing_chain() {
    let mut t = transformer();
    for (i, raw) in [500, 500, 500].iter().enumerate() {
        t.ingest(
            &decode_frame(&frame_line(false, *raw, i as u64)).unwrap(),
            i as u64 * 50,
        );
    }
    t.ingest(&decode_frame(&frame_line(false, 1023, 4)).unwrap(), 200);

    let snap = t.snapshot(200);
    let fuel = &snap.analog["fuel_sender_raw"];
    // Clamp bounds the step to 500+120=620, EMA takes a quarter step
    assert_eq!(fuel.raw, Some(1023));
    assert_eq!(fuel.smooth, Some(530.0));
    // norm tracks the smoothed value: 530/1023 rounded to 4 decimals
    assert_eq!(fuel.norm, Some(0.5181));
}

#[test]
fn test_inverted_channel_normalization() {
    let mut pinmap = PinMap::default();
    pinmap.analog.insert(
        "A0".to_string(),
        AnalogChannel {
            name: "fuel_plain".to_string(),
            min: 0,
            max: 1000,
            invert: false,
        },
    );
    pinmap.analog.insert(
        "A1".to_string(),
        AnalogChannel {
            name: "fuel_inverted".to_string(),
            min: 0,
            max: 1000,
            invert: true,
        },
    );

    let mut t =
        VehicleStateTransformer::new(pinmap, &FilterTuning::default(), STALE_AFTER_MS, "hub");
    let frame = decode_frame(
        r#"{"type":"vehicle_inputs","analog":{"A0":250,"A1":250}}"#,
    )
    .unwrap();
    t.ingest(&frame, 0);

    let snap = t.snapshot(0);
    let plain = snap.analog["fuel_plain"].norm.unwrap();
    let inverted = snap.analog["fuel_inverted"].norm.unwrap();
    assert_eq!(plain, 0.25);
    assert_eq!(inverted, 0.75);
}

#[test]
fn test_pinmap_file_drives_the_pipeline() {
    use std::io::Write;

    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"{{
            "digital": {{"D3": "right_indicator", "D7": "charge_lamp"}},
            "analog": {{"A1": {{"name": "coolant_sender_raw", "min": 100, "max": 900}}}}
        }}"#
    )
    .unwrap();

    let pinmap = PinMap::load(f.path()).unwrap();
    let mut t =
        VehicleStateTransformer::new(pinmap, &FilterTuning::default(), STALE_AFTER_MS, "hub");

    let frame = decode_frame(
        r#"{"type":"vehicle_inputs","inputs":{"D7":true},"analog":{"A1":500}}"#,
    )
    .unwrap();
    t.ingest(&frame, 0);
    t.ingest(&frame, 40);

    let snap = t.snapshot(40);
    assert!(snap.warnings.charge);
    // Unmapped names stay at their defaults
    assert!(!snap.indicators.left);
    assert_eq!(snap.analog.len(), 1);
    assert_eq!(snap.analog["coolant_sender_raw"].norm, Some(0.5));
}

#[test]
fn test_staleness_end_to_end() {
    let mut t = transformer();
    assert!(t.snapshot(0).health.stale);

    t.ingest(&decode_frame(&frame_line(false, 512, 1)).unwrap(), 100);
    assert!(!t.snapshot(100).health.stale);
    assert_eq!(t.snapshot(100).health.last_rx_ms, Some(100));

    // Threshold is exclusive
    assert!(!t.snapshot(100 + STALE_AFTER_MS).health.stale);
    assert!(t.snapshot(101 + STALE_AFTER_MS).health.stale);

    // A new frame recovers freshness immediately
    t.ingest(&decode_frame(&frame_line(false, 512, 2)).unwrap(), 2000);
    assert!(!t.snapshot(2000).health.stale);
}

#[test]
fn test_partial_frames_default_missing_fields() {
    let mut t = transformer();
    let frame: RawFrame = decode_frame(r#"{"type":"vehicle_inputs"}"#).unwrap();
    t.ingest(&frame, 0);

    let snap = t.snapshot(0);
    assert_eq!(snap.seq, 0);
    assert_eq!(snap.uptime_ms, 0);
    assert_eq!(snap.heartbeat, 0);
    assert!(!snap.indicators.left);
    for reading in snap.analog.values() {
        assert_eq!(reading.raw, None);
    }
}
