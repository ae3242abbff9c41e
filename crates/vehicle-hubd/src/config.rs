//! Daemon configuration
//!
//! TOML file, every section optional:
//!
//! ```toml
//! pinmap = "pinmap.json"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8765
//!
//! [broadcast]
//! rate_hz = 10.0
//!
//! [health]
//! stale_after_ms = 750
//!
//! [filters]
//! min_stable_ms = 30
//!
//! [source]
//! type = "tcp"
//! addr = "192.168.7.2:9000"
//!
//! [backoff]
//! initial_ms = 250
//! max_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hub_core::FilterTuning;
use hub_source::{BackoffConfig, SourceConfig};

/// Top-level daemon config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    /// Pin map JSON file; the stock mapping is used when unset
    #[serde(default)]
    pub pinmap: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub filters: FilterTuning,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub backoff: BackoffConfig,
}

impl HubConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<HubConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Listen address for the broadcast surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8765
}

/// Snapshot recomputation and republish cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Snapshots per second; clamped to at least 1
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Service name in the hello handshake
    #[serde(default = "default_service")]
    pub service: String,
    /// Source id stamped on every snapshot
    #[serde(default = "default_source_id")]
    pub source_id: String,
}

impl BroadcastConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz.max(1.0))
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            service: default_service(),
            source_id: default_source_id(),
        }
    }
}

fn default_rate_hz() -> f64 {
    10.0
}

fn default_service() -> String {
    "vehicle_hub".to_string()
}

fn default_source_id() -> String {
    "vehicle_hub".to_string()
}

/// Staleness policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Snapshots flag stale once the last frame is older than this
    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: default_stale_after_ms(),
        }
    }
}

fn default_stale_after_ms() -> u64 {
    750
}
