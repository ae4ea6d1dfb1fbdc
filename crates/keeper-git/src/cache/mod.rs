//! Revision content cache.
//!
//! Content addressed by a fixed revision never changes, so entries are kept
//! for the lifetime of the process: there is no TTL and no capacity bound.

mod keys;
mod stats;
mod revision_cache;

pub use keys::RevisionKey;
pub use stats::{CacheMetrics, register_cache_metrics};
pub use revision_cache::RevisionCache;
