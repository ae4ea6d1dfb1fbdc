#![allow(dead_code)]
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use keeper_git::{GitError, KeeperBackend, ObjectStore, SyncConfig};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Object store double that serves fixed blobs and records every call.
#[derive(Default)]
pub struct RecordingStore {
    blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
    fetches: AtomicUsize,
    refreshes: AtomicUsize,
    fetch_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `content` for `revision:path`.
    pub fn with_blob(self, revision: &str, path: &str, content: &str) -> Self {
        self.blobs
            .lock()
            .insert((revision.to_string(), path.to_string()), content.as_bytes().to_vec());
        self
    }

    /// Delays every blob fetch, widening race windows.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn fetch_blob(
        &self,
        _repo_root: &Path,
        rel_path: &str,
        revision: &str,
    ) -> Result<Vec<u8>, GitError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        self.blobs
            .lock()
            .get(&(revision.to_string(), rel_path.to_string()))
            .cloned()
            .ok_or_else(|| {
                GitError::failed(
                    "cat-file",
                    format!("fatal: Not a valid object name {revision}:{rel_path}"),
                )
            })
    }

    async fn refresh(&self, _repo_root: &Path) -> Result<String, GitError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok("Already up to date.".to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Writes `content` at `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture dirs");
    }
    std::fs::write(path, content).expect("Failed to write fixture file");
}

/// Builds the standard sandbox:
///
/// ```text
/// acme/site1/index.conf            port {{port}}
/// acme/site1/templates/.git/       repository marker
/// acme/site1/templates/a.txt       current {{name}}
/// acme/site1/plain/b.txt           no repository
/// acme/site1/submodule/.git        marker file, not a directory
/// acme/site1/submodule/c.txt
/// ```
pub fn sandbox() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();
    write_file(root, "acme/site1/index.conf", "port {{port}}");
    std::fs::create_dir_all(root.join("acme/site1/templates/.git")).unwrap();
    write_file(root, "acme/site1/templates/a.txt", "current {{name}}");
    write_file(root, "acme/site1/templates/nested/d.txt", "nested");
    write_file(root, "acme/site1/plain/b.txt", "plain");
    write_file(root, "acme/site1/submodule/.git", "gitdir: ../.git/modules/submodule");
    write_file(root, "acme/site1/submodule/c.txt", "sub");
    dir
}

/// Creates a backend over `root` that talks to `store`.
pub fn backend(root: &Path, store: Arc<RecordingStore>) -> KeeperBackend {
    KeeperBackend::new(root, store, SyncConfig::default()).expect("Failed to create backend")
}
