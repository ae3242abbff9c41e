//! hub-core - Core types and signal pipeline for the vehicle hub
//!
//! This crate turns raw microcontroller input frames into a stable,
//! always-schema-complete vehicle state snapshot:
//!
//! - [`mapping`] - pin-to-signal mapping config and analog normalization
//! - [`stabilize`] - debounce, flash detection, outlier clamp, EMA
//! - [`transform`] - per-channel filter chains and snapshot assembly
//! - [`snapshot`] - the published `vehicle_state` wire model
//! - [`slot`] - the shared latest-snapshot slot (whole-value replacement)

pub mod clock;
pub mod error;
pub mod frame;
pub mod mapping;
pub mod slot;
pub mod snapshot;
pub mod stabilize;
pub mod staleness;
pub mod transform;

pub use clock::now_ms;
pub use error::MappingError;
pub use frame::{decode_frame, RawFrame};
pub use mapping::{AnalogChannel, PinMap};
pub use slot::SnapshotSlot;
pub use snapshot::{AnalogReading, Health, Hello, Indicators, Spares, VehicleStateSnapshot, Warnings};
pub use stabilize::{Ema, FilterTuning, FlashDetector, HoldLatch, OutlierClamp};
pub use staleness::StalenessMonitor;
pub use transform::VehicleStateTransformer;
