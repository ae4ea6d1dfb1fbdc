//! Metrics for the String Keeper server.

pub mod http;
pub mod setup;

pub use setup::init_metrics;
