//! One-shot snapshot endpoint

use axum::extract::State;
use axum::Json;

use hub_core::VehicleStateSnapshot;

use crate::state::AppState;

/// GET /state
///
/// Returns the currently published snapshot. Schema-complete from process
/// start; before any frame arrives it reports defaults with `stale: true`.
pub async fn get_state(State(state): State<AppState>) -> Json<VehicleStateSnapshot> {
    Json((*state.slot.current()).clone())
}
