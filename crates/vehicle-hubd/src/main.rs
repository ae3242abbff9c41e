//! vehicle-hubd - Vehicle Hub Daemon
//!
//! Bridges raw microcontroller input frames to a stable, always-complete
//! `vehicle_state` snapshot served over WebSocket.
//!
//! Usage:
//!   vehicle-hubd [OPTIONS] [config.toml]
//!
//! Options:
//!   --pinmap <path>  Pin map JSON file (overrides the config file entry)
//!
//! If no config file is provided, the built-in simulator source and the
//! stock pin map are used for demo purposes.

mod config;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hub_core::{now_ms, PinMap, SnapshotSlot, VehicleStateTransformer};
use hub_ws::AppState;

use crate::config::HubConfig;

/// Parsed command-line arguments
struct Args {
    /// Daemon config file (TOML)
    config_path: Option<String>,
    /// Pin map override
    pinmap: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        config_path: None,
        pinmap: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--pinmap" | "-p" => {
                if i + 1 < args.len() {
                    result.pinmap = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    tracing::error!("Missing argument for --pinmap");
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
                i += 1;
            }
            _ => {
                tracing::warn!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"vehicle-hubd - Vehicle Hub Daemon

Usage: vehicle-hubd [OPTIONS] [config.toml]

Options:
  -p, --pinmap <path>  Pin map JSON file (overrides the config file entry)
  -h, --help           Print this help message

Examples:
  # Run with the built-in simulator and stock pin map
  vehicle-hubd

  # Run against a real frame source
  vehicle-hubd hub.toml

  # Override the pin map
  vehicle-hubd --pinmap pinmap.json hub.toml
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_hubd=info,hub_source=info,hub_ws=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vehicle-hubd");

    let args = parse_args();

    let cfg = if let Some(ref path) = args.config_path {
        tracing::info!("Loading config from: {}", path);
        HubConfig::load(path)?
    } else {
        tracing::info!("No config file provided, using simulator source");
        HubConfig::default()
    };

    // Pin map: an invalid file is the one fatal startup condition
    let pinmap_path = args
        .pinmap
        .map(std::path::PathBuf::from)
        .or_else(|| cfg.pinmap.clone());
    let pinmap = match pinmap_path {
        Some(path) => {
            tracing::info!("Loading pin map from: {}", path.display());
            PinMap::load(&path)?
        }
        None => {
            tracing::info!("No pin map configured, using stock mapping");
            PinMap::stock()
        }
    };
    tracing::info!(
        digital = pinmap.digital.len(),
        analog = pinmap.analog.len(),
        "Pin map loaded"
    );

    // One transformer instance, owned here and shared with the ingestion
    // task (writer) and the recompute pump (reader)
    let transformer = Arc::new(Mutex::new(VehicleStateTransformer::new(
        pinmap,
        &cfg.filters,
        cfg.health.stale_after_ms,
        cfg.broadcast.source_id.clone(),
    )));

    // Seed the slot so subscribers never see an empty state
    let slot = SnapshotSlot::new(transformer.lock().snapshot(now_ms()));

    // Frame ingestion: source acquisition + backoff + transform
    tokio::spawn(hub_source::run_ingest(
        cfg.source.connector(),
        transformer.clone(),
        cfg.backoff.clone(),
    ));

    // Recompute pump: fresh snapshot on a fixed cadence, independent of
    // frame arrival
    let pump_slot = slot.clone();
    let pump_transformer = transformer.clone();
    let pump_interval = cfg.broadcast.interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(pump_interval);
        loop {
            ticker.tick().await;
            let snapshot = pump_transformer.lock().snapshot(now_ms());
            pump_slot.publish(snapshot);
        }
    });

    // WebSocket broadcast surface
    let state = AppState::new(
        slot,
        cfg.broadcast.service.clone(),
        cfg.broadcast.source_id.clone(),
        cfg.broadcast.interval(),
    );
    let app = hub_ws::create_router(state);

    let listener =
        tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    tracing::info!(
        "Listening on ws://{}:{}/ws",
        cfg.server.host,
        cfg.server.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
