//! Test helpers for keeper-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use keeper_git::{KeeperBackend, SyncConfig};
use keeper_server::config::{AclConfig, CorsConfig};
use keeper_server::{AppState, create_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tempfile::TempDir;

pub use client::{TestClient, TestResponse};
pub use store::FixedStore;

/// A router over a temporary sandbox.
pub struct TestApp {
    pub dir: TempDir,
    pub store: Arc<FixedStore>,
    pub backend: Arc<KeeperBackend>,
    pub client: TestClient,
}

impl TestApp {
    pub async fn shutdown(&self) {
        self.backend.shutdown().await;
    }
}

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Builds the sandbox:
///
/// ```text
/// acme/site1/index.conf        port {{port}}
/// acme/site1/templates/.git/
/// acme/site1/templates/a.txt   current {{name}}
/// acme/site1/plain/b.txt
/// ```
///
/// with `abc123:a.txt` = `hello {{name}}` in the store.
pub fn app_with(acl: AclConfig, cors: CorsConfig) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_file(dir.path(), "acme/site1/index.conf", "port {{port}}");
    std::fs::create_dir_all(dir.path().join("acme/site1/templates/.git")).unwrap();
    write_file(dir.path(), "acme/site1/templates/a.txt", "current {{name}}");
    write_file(dir.path(), "acme/site1/plain/b.txt", "plain");

    let store = Arc::new(FixedStore::default().with_blob("abc123", "a.txt", "hello {{name}}"));
    let backend = Arc::new(
        KeeperBackend::new(dir.path(), store.clone(), SyncConfig::default())
            .expect("Failed to create backend"),
    );

    // Render-only handle: no global recorder is installed by tests.
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::new(Arc::clone(&backend), acl);
    let client = TestClient::new(create_router(state, &cors, prometheus));

    TestApp {
        dir,
        store,
        backend,
        client,
    }
}

pub fn app() -> TestApp {
    app_with(AclConfig::default(), CorsConfig::default())
}
