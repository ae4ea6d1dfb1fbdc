//! Metrics endpoint handler.

use axum::{
    extract::State,
    http::{HeaderValue, header},
    response::IntoResponse,
};
use metrics_exporter_prometheus::PrometheusHandle;

/// Prometheus text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handler for GET /metrics
pub async fn metrics_handler(State(prometheus): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(EXPOSITION_CONTENT_TYPE),
        )],
        prometheus.render(),
    )
}
