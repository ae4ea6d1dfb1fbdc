//! Background synchronization of discovered repositories.
//!
//! Each repository root that is classified as version-controlled gets
//! exactly one refresh loop, owned by the [`SyncScheduler`].

mod scheduler;
mod state;

pub use scheduler::{SyncConfig, SyncScheduler};
pub use state::{SyncState, SyncStatus};

/// Describes the sync metrics.
/// Call once at startup, after the recorder is installed.
pub fn register_sync_metrics() {
    metrics::describe_counter!(
        "keeper_sync_tasks_started_total",
        "Number of repository sync loops started"
    );
    metrics::describe_counter!(
        "keeper_sync_refresh_total",
        "Repository refreshes by outcome"
    );
}
