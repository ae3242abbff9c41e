//! hub-ws - WebSocket broadcast surface for the vehicle hub
//!
//! Subscribers connect to `/ws`, receive a `hello` handshake, then the
//! current snapshot on every broadcast tick until their connection drops.
//! `/state` returns the current snapshot once, for debugging and polling
//! consumers. Each subscriber loop lives and dies alone; a failed write
//! never touches the pump, ingestion, or other subscribers.

pub mod handlers;
pub mod sink;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use sink::{SinkError, SnapshotSink};
pub use state::AppState;

/// Build the hub router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/state", get(handlers::state::get_state))
        .with_state(state)
}
