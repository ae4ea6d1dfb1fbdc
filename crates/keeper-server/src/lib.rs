//! # Keeper Server
//!
//! HTTP front end for String Keeper, built on Axum.
//!
//! ## Endpoints
//!
//! - `POST /` - fetch a string, optionally at a revision
//! - `GET /sync` - repository sync diagnostics
//! - `GET /ping` - liveness probe
//! - `GET /health` - health check
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod state;

pub use self::config::KeeperConfig;
pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, run_server};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
