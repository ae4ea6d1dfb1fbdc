use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Repositories with a running sync loop.
    pub repositories: usize,
}

impl HealthResponse {
    pub fn up(repositories: usize) -> Self {
        Self {
            status: "UP".to_string(),
            repositories,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::up(state.backend().scheduler().len()))
}

/// Handler for GET /ping
pub async fn ping() -> &'static str {
    "pong"
}
