mod helpers;

use axum::http::StatusCode;
use helpers::app;
use serde_json::{Value, json};

#[tokio::test]
async fn ping_returns_pong() {
    app()
        .client
        .get("/ping")
        .await
        .assert_status(StatusCode::OK)
        .assert_body("pong");
}

#[tokio::test]
async fn health_reports_repositories() {
    let app = app();

    let health: Value = app.client.get("/health").await.json();
    assert_eq!(health, json!({"status": "UP", "repositories": 0}));

    app.client
        .post_json(&json!({
            "namespace": "acme",
            "bucket": "site1",
            "revision": "abc123",
            "file": "templates/a.txt",
            "raw_data": true
        }))
        .await
        .assert_status(StatusCode::OK);

    let health: Value = app.client.get("/health").await.json();
    assert_eq!(health["repositories"], 1);

    app.shutdown().await;
}

#[tokio::test]
async fn sync_lists_discovered_repositories() {
    let app = app();

    let empty: Vec<Value> = app.client.get("/sync").await.json();
    assert!(empty.is_empty());

    app.client
        .post_json(&json!({
            "namespace": "acme",
            "bucket": "site1",
            "revision": "abc123",
            "file": "templates/a.txt",
            "raw_data": true
        }))
        .await
        .assert_status(StatusCode::OK);

    let status: Vec<Value> = app.client.get("/sync").await.json();
    assert_eq!(status.len(), 1);
    assert!(
        status[0]["root"]
            .as_str()
            .unwrap()
            .ends_with("templates")
    );

    app.shutdown().await;
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    app()
        .client
        .get("/metrics")
        .await
        .assert_status(StatusCode::OK)
        .assert_content_type_contains("version=0.0.4");
}

#[test]
fn health_response_serializes_correctly() {
    use keeper_server::HealthResponse;

    let json = serde_json::to_string(&HealthResponse::up(2)).unwrap();
    assert_eq!(json, r#"{"status":"UP","repositories":2}"#);
}
