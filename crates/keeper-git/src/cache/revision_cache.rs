//! Read-through cache of blob content using Moka.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use tracing::debug;

use super::{CacheMetrics, RevisionKey};
use crate::error::GitError;

/// Cache of blob content keyed by repository, revision and path.
///
/// Thread-safe and async-friendly. Built without capacity or expiry, so an
/// entry, once written, is observed with the same value until the process
/// exits.
#[derive(Clone)]
pub struct RevisionCache {
    inner: Cache<RevisionKey, Arc<[u8]>>,
    metrics: CacheMetrics,
}

impl RevisionCache {
    /// Creates an empty, unbounded cache.
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().name("revision-content").build(),
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns the cached content for `key`, if any.
    pub async fn get(&self, key: &RevisionKey) -> Option<Arc<[u8]>> {
        let result = self.inner.get(key).await;
        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        result
    }

    /// Stores content for `key`.
    pub async fn insert(&self, key: RevisionKey, content: impl Into<Arc<[u8]>>) {
        self.inner.insert(key, content.into()).await;
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Returns the cached content for `key`, calling `fetch` on a miss.
    ///
    /// Concurrent misses for the same key share a single `fetch`; a failed
    /// fetch is not cached and is returned to every waiting caller.
    pub async fn get_or_fetch<F, Fut>(&self, key: RevisionKey, fetch: F) -> Result<Arc<[u8]>, GitError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, GitError>>,
    {
        if let Some(cached) = self.inner.get(&key).await {
            self.metrics.record_hit();
            return Ok(cached);
        }

        self.metrics.record_miss();
        debug!(object = %key, "Revision cache miss");

        let content = self
            .inner
            .try_get_with(key, async move { fetch().await.map(Arc::<[u8]>::from) })
            .await
            .map_err(|e: Arc<GitError>| (*e).clone())?;

        self.metrics.update_entry_count(self.inner.entry_count());
        Ok(content)
    }

    /// Returns the approximate number of entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Applies pending internal maintenance so `entry_count` is exact.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Returns the hit/miss counters.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

impl Default for RevisionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RevisionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionCache")
            .field("entries", &self.entry_count())
            .finish()
    }
}
