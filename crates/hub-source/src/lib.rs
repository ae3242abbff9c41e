//! hub-source - Frame source connectors and the ingestion loop
//!
//! The physical link to the microcontroller lives behind two seams:
//! [`SourceConnector`] acquires a link, [`FrameSource`] yields parsed
//! frames from it. [`ingest::run_ingest`] drives both forever with
//! exponential reconnect backoff, feeding accepted frames into the
//! transformer. The pipeline never learns what the transport is.

pub mod config;
pub mod ingest;
pub mod sim;
pub mod source;
pub mod tcp;

pub use config::{BackoffConfig, SimSourceConfig, SourceConfig, TcpSourceConfig};
pub use ingest::run_ingest;
pub use sim::SimConnector;
pub use source::{FrameSource, SourceConnector, SourceError};
pub use tcp::TcpConnector;
