//! WebSocket subscriber handling
//!
//! Each accepted connection gets its own send loop: hello handshake first,
//! then the current snapshot every broadcast interval. Delivery is
//! best-effort latest-value; there is no backlog or ack. The first failed
//! write ends that subscriber's loop and nothing else.

use axum::extract::ws::WebSocket;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::debug;

use hub_core::{now_ms, Hello};

use crate::sink::SnapshotSink;
use crate::state::AppState;

/// GET /ws
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_subscriber(socket, state))
}

async fn handle_subscriber(socket: WebSocket, state: AppState) {
    debug!("subscriber connected");
    run_subscriber(socket, state).await;
    debug!("subscriber loop ended");
}

/// Drive one subscriber until its sink fails.
///
/// Generic over the sink so tests can run it against a recording double.
pub async fn run_subscriber<S: SnapshotSink>(mut sink: S, state: AppState) {
    let hello = Hello::new(state.service.clone(), state.source.clone(), now_ms());
    let hello_text = serde_json::to_string(&hello).unwrap_or_default();
    if sink.send_text(hello_text).await.is_err() {
        return;
    }

    let mut ticker = tokio::time::interval(state.broadcast_interval);
    loop {
        ticker.tick().await;
        let text = serde_json::to_string(&*state.slot.current()).unwrap_or_default();
        if let Err(e) = sink.send_text(text).await {
            debug!(error = %e, "subscriber gone");
            return;
        }
    }
}
