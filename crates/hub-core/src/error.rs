//! Error types for loading the pin mapping config

use thiserror::Error;

/// Errors raised while loading a [`crate::PinMap`] from disk.
///
/// An unreadable or invalid mapping file is the only condition that is
/// allowed to abort hub startup; everything downstream degrades at runtime.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping file could not be read
    #[error("failed to read pin map {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Mapping file is not valid JSON (or has the wrong shape)
    #[error("failed to parse pin map {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A digital signal name appears on more than one pin
    #[error("duplicate digital signal name: {0}")]
    DuplicateSignal(String),
}
