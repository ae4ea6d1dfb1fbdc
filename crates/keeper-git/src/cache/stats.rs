//! Cache metrics recording.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{counter, gauge};

/// Describes the revision cache metrics.
/// Call once at startup, after the recorder is installed.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "keeper_revision_cache_hits_total",
        "Total number of revision cache hits"
    );
    metrics::describe_counter!(
        "keeper_revision_cache_misses_total",
        "Total number of revision cache misses"
    );
    metrics::describe_gauge!(
        "keeper_revision_cache_entries",
        "Current number of cached blobs"
    );
}

/// Hit/miss counters for the revision cache.
///
/// Keeps local atomics alongside the global recorder so the counts can be
/// read back without a metrics exporter.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("keeper_revision_cache_hits_total").increment(1);
    }

    /// Records a cache miss.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("keeper_revision_cache_misses_total").increment(1);
    }

    /// Updates the entry gauge.
    pub fn update_entry_count(&self, count: u64) {
        gauge!("keeper_revision_cache_entries").set(count as f64);
    }

    /// Returns the number of hits.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of misses.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that were hits.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }
}
