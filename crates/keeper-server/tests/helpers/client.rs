//! Test client helpers.

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Peer address attached to every request unless overridden.
pub const DEFAULT_PEER: &str = "127.0.0.1:40000";

/// Drives a router in-process.
pub struct TestClient {
    app: Router,
    peer: SocketAddr,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            peer: DEFAULT_PEER.parse().unwrap(),
        }
    }

    /// Sends every request as if it came from `peer`.
    pub fn from_peer(mut self, peer: &str) -> Self {
        self.peer = peer.parse().unwrap();
        self
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_headers(uri, vec![]).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method("GET");
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// POSTs `body` to `/` as JSON.
    pub async fn post_json(&self, body: &Value) -> TestResponse {
        self.post_with_headers(body.to_string(), vec![]).await
    }

    /// POSTs `body` to `/` with basic credentials.
    pub async fn post_json_as(&self, body: &Value, user: &str, password: &str) -> TestResponse {
        let credentials = format!("Basic {}", STANDARD.encode(format!("{user}:{password}")));
        self.post_with_headers(
            body.to_string(),
            vec![("authorization", credentials.as_str())],
        )
        .await
    }

    /// POSTs a raw body to `/`.
    pub async fn post_with_headers(
        &self,
        body: impl Into<Body>,
        headers: Vec<(&str, &str)>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .uri("/")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        self.request(builder.body(body.into()).unwrap()).await
    }

    /// Sends an arbitrary request.
    pub async fn request(&self, mut request: Request<Body>) -> TestResponse {
        request.extensions_mut().insert(ConnectInfo(self.peer));

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper over Response with assertion helpers.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    pub fn assert_body(&self, expected: &str) -> &Self {
        assert_eq!(self.text(), expected);
        self
    }

    pub fn assert_body_contains(&self, expected: &str) -> &Self {
        let text = self.text();
        assert!(
            text.contains(expected),
            "Expected body to contain '{}' but got '{}'",
            expected,
            text
        );
        self
    }

    pub fn assert_content_type_contains(&self, expected: &str) -> &Self {
        let content_type = self
            .header("content-type")
            .expect("Response missing Content-Type header");

        assert!(
            content_type.contains(expected),
            "Expected Content-Type to contain '{}' but got '{}'",
            expected,
            content_type
        );
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to exist",
            name
        );
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));

        assert_eq!(
            value, expected,
            "Expected header '{}' to be '{}' but got '{}'",
            name, expected, value
        );
        self
    }
}
