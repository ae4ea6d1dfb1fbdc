//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::http::register_http_metrics;

/// Histogram buckets in seconds, from 100us to 30s.
///
/// The upper end covers `git` calls running up to their timeout.
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
    10.0, 30.0,
];

/// Installs the global Prometheus recorder and returns its handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    register_http_metrics();
    keeper_git::cache::register_cache_metrics();
    keeper_git::sync::register_sync_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}
