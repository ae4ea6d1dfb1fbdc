//! Middleware stack for the HTTP server.
//!
//! - `RequestIdLayer`: generates or propagates X-Request-Id
//! - `LoggingLayer`: structured request logging
//! - `ip_filter` / `basic_auth`: access control for the string endpoints
//! - `cors_layer`: CORS from configuration

mod acl;
mod cors;
mod logging;
mod request_id;

pub use acl::{AuthUser, basic_auth, ip_filter};
pub use cors::cors_layer;
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
