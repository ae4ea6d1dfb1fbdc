use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tracing::{error, info};

use crate::config::CorsConfig;
use crate::handlers::{
    health::{health_check, ping},
    metrics::metrics_handler,
    strings::get_string,
    sync::sync_status,
};
use crate::middleware::{LoggingLayer, RequestIdLayer, basic_auth, cors_layer, ip_filter};
use crate::state::AppState;

/// Creates the application router.
///
/// `POST /` passes basic auth and then the IP allow-list. `GET /sync`
/// passes basic auth only. Probes and metrics are open.
pub fn create_router(
    state: AppState,
    cors: &CorsConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let app_router = Router::new()
        .route("/", post(get_string))
        .route_layer(middleware::from_fn_with_state(state.clone(), ip_filter))
        .route("/sync", get(sync_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), basic_auth))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(cors_layer(cors))
        .layer(middleware_stack)
}

/// Serves `app` on `addr` until Ctrl+C or SIGTERM.
///
/// Peer addresses are exposed to handlers as `ConnectInfo<SocketAddr>`.
pub async fn run_server(addr: SocketAddr, app: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
