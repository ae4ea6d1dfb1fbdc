//! Object store double.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keeper_git::{GitError, ObjectStore};
use parking_lot::Mutex;

/// Serves fixed blobs and counts fetches.
#[derive(Default)]
pub struct FixedStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl FixedStore {
    pub fn with_blob(self, revision: &str, path: &str, content: &str) -> Self {
        self.blobs
            .lock()
            .insert(format!("{revision}:{path}"), content.as_bytes().to_vec());
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FixedStore {
    async fn fetch_blob(
        &self,
        _repo_root: &Path,
        rel_path: &str,
        revision: &str,
    ) -> Result<Vec<u8>, GitError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let object = format!("{revision}:{rel_path}");
        self.blobs
            .lock()
            .get(&object)
            .cloned()
            .ok_or_else(|| GitError::failed("cat-file", format!("fatal: Not a valid object name {object}")))
    }

    async fn refresh(&self, _repo_root: &Path) -> Result<String, GitError> {
        Ok("Already up to date.".to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
