//! Frame source configuration

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sim::SimConnector;
use crate::source::SourceConnector;
use crate::tcp::TcpConnector;

/// Which frame source to use
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Newline-delimited JSON over TCP
    Tcp(TcpSourceConfig),
    /// Built-in simulator (demo mode)
    Sim(SimSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Sim(SimSourceConfig::default())
    }
}

impl SourceConfig {
    /// Build the connector this config describes.
    pub fn connector(&self) -> Arc<dyn SourceConnector> {
        match self {
            SourceConfig::Tcp(cfg) => Arc::new(TcpConnector::new(
                cfg.addr.clone(),
                Duration::from_millis(cfg.read_timeout_ms),
            )),
            SourceConfig::Sim(cfg) => {
                Arc::new(SimConnector::new(Duration::from_millis(cfg.period_ms)))
            }
        }
    }
}

/// TCP frame source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpSourceConfig {
    /// host:port of the NDJSON frame service
    pub addr: String,
    /// Per-read timeout; expiry just polls again
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_read_timeout_ms() -> u64 {
    500
}

/// Simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSourceConfig {
    /// Frame period
    #[serde(default = "default_sim_period_ms")]
    pub period_ms: u64,
}

impl Default for SimSourceConfig {
    fn default() -> Self {
        Self {
            period_ms: default_sim_period_ms(),
        }
    }
}

fn default_sim_period_ms() -> u64 {
    50
}

/// Reconnect backoff bounds for the ingestion loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// First retry delay
    #[serde(default = "default_backoff_initial_ms")]
    pub initial_ms: u64,
    /// Delay ceiling; doubling stops here
    #[serde(default = "default_backoff_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_ms: default_backoff_initial_ms(),
            max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_backoff_initial_ms() -> u64 {
    250
}

fn default_backoff_max_ms() -> u64 {
    5000
}
