//! HTTP handlers.

pub mod health;
pub mod metrics;
pub mod strings;
pub mod sync;
