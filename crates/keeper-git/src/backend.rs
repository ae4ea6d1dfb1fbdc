//! Revision-aware string backend.

use std::io;
use std::path::Path;
use std::sync::Arc;

use keeper_core::{
    KeeperError, PathResolver, PlaceholderRenderer, Renderer, ResolvedPath, StringRequest,
    validate_revision,
};
use tokio::task;
use tracing::{debug, info};

use crate::cache::{RevisionCache, RevisionKey};
use crate::repository::RepositoryLocator;
use crate::source::ObjectStore;
use crate::sync::{SyncConfig, SyncScheduler, SyncStatus};

/// Serves string resources from a sandboxed tree, optionally at a revision.
///
/// Requests without a revision are read straight from disk. Requests with
/// a revision are resolved against the repository found directly below the
/// bucket root and served through the [`RevisionCache`].
pub struct KeeperBackend {
    resolver: PathResolver,
    locator: Arc<RepositoryLocator>,
    cache: RevisionCache,
    store: Arc<dyn ObjectStore>,
    scheduler: Arc<SyncScheduler>,
    renderer: Arc<dyn Renderer>,
}

impl KeeperBackend {
    /// Creates a backend rooted at `root`, which must exist.
    pub fn new(
        root: impl AsRef<Path>,
        store: Arc<dyn ObjectStore>,
        sync: SyncConfig,
    ) -> Result<Self, KeeperError> {
        let resolver = PathResolver::new(root)?;
        let scheduler = Arc::new(SyncScheduler::new(Arc::clone(&store), sync));

        info!(
            "String backend rooted at {} using {} object store",
            resolver.root().display(),
            store.name()
        );

        Ok(Self {
            resolver,
            locator: Arc::new(RepositoryLocator::new(Arc::clone(&scheduler))),
            cache: RevisionCache::new(),
            store,
            scheduler,
            renderer: Arc::new(PlaceholderRenderer),
        })
    }

    /// Replaces the variable renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns the canonical sandbox root.
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Returns the repository locator.
    pub fn locator(&self) -> &RepositoryLocator {
        &self.locator
    }

    /// Returns the revision cache.
    pub fn cache(&self) -> &RevisionCache {
        &self.cache
    }

    /// Returns the sync scheduler.
    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    /// Returns a snapshot of every repository sync loop.
    pub fn sync_status(&self) -> Vec<SyncStatus> {
        self.scheduler.status()
    }

    /// Produces the response body for a request.
    ///
    /// The request is normalized first. Unless `raw_data` is set the content
    /// is rendered with the request variables.
    pub async fn fetch(&self, request: StringRequest) -> Result<Vec<u8>, KeeperError> {
        let request = request.normalized()?;
        let content = self.read(&request).await?;

        if request.raw_data {
            return Ok(content);
        }

        let text = String::from_utf8(content)
            .map_err(|_| KeeperError::template("file content is not valid UTF-8"))?;
        Ok(self.renderer.render(&text, &request.envs)?.into_bytes())
    }

    /// Reads the unrendered content for a normalized request.
    pub async fn read(&self, request: &StringRequest) -> Result<Vec<u8>, KeeperError> {
        let resolved = self
            .resolver
            .resolve(&request.namespace, &request.bucket, &request.file)
            .await?;

        match request.revision() {
            None => read_current(&resolved).await,
            Some(revision) => self.read_revision(&resolved, revision).await,
        }
    }

    /// Reads a file at `revision` through the cache.
    async fn read_revision(
        &self,
        resolved: &ResolvedPath,
        revision: &str,
    ) -> Result<Vec<u8>, KeeperError> {
        validate_revision(revision)?;

        let locator = Arc::clone(&self.locator);
        let bucket_root = resolved.bucket_root.clone();
        let file = resolved.file.clone();
        let managed = task::spawn_blocking(move || locator.classify(&bucket_root, &file))
            .await
            .map_err(|e| KeeperError::io(&resolved.file, io::Error::other(e)))??;
        let key = RevisionKey::new(&managed.repo_root, revision, &managed.rel_path);

        debug!(repo = %managed.repo_root.display(), object = %key, "Reading revision");

        let store = Arc::clone(&self.store);
        let content = self
            .cache
            .get_or_fetch(key, || async move {
                store
                    .fetch_blob(&managed.repo_root, &managed.rel_path, revision)
                    .await
            })
            .await?;

        Ok(content.to_vec())
    }

    /// Stops every repository sync loop and waits for them to finish.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}

async fn read_current(resolved: &ResolvedPath) -> Result<Vec<u8>, KeeperError> {
    tokio::fs::read(&resolved.file)
        .await
        .map_err(|e| KeeperError::io(&resolved.file, e))
}

impl std::fmt::Debug for KeeperBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeeperBackend")
            .field("root", &self.resolver.root())
            .field("store", &self.store.name())
            .field("locator", &self.locator)
            .field("cache", &self.cache)
            .finish()
    }
}
