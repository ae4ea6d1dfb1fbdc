//! Repository sync diagnostics.

use axum::{Json, extract::State};
use keeper_git::SyncStatus;

use crate::state::AppState;

/// Handler for GET /sync
pub async fn sync_status(State(state): State<AppState>) -> Json<Vec<SyncStatus>> {
    Json(state.backend().sync_status())
}
