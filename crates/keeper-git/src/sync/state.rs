//! Per-repository sync state tracking.

use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Default)]
struct Inner {
    successes: u64,
    failure_count: u32,
    last_output: Option<String>,
    last_error: Option<String>,
    last_success: Option<Instant>,
}

/// Tracks refresh outcomes for one repository.
#[derive(Debug, Default)]
pub struct SyncState {
    inner: RwLock<Inner>,
}

impl SyncState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful refresh and its output.
    pub fn record_success(&self, output: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.successes += 1;
        inner.failure_count = 0;
        inner.last_output = Some(output.into());
        inner.last_error = None;
        inner.last_success = Some(Instant::now());
    }

    /// Records a failed refresh.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.failure_count += 1;
        inner.last_error = Some(error.into());
    }

    /// Returns the number of successful refreshes.
    pub fn successes(&self) -> u64 {
        self.inner.read().successes
    }

    /// Returns the number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        self.inner.read().failure_count
    }

    /// Returns the last error diagnostic, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Returns true if at least one refresh succeeded and none failed since.
    pub fn is_healthy(&self) -> bool {
        let inner = self.inner.read();
        inner.successes > 0 && inner.failure_count == 0
    }

    /// Captures the state for diagnostics.
    pub fn snapshot(&self, root: &Path) -> SyncStatus {
        let inner = self.inner.read();
        SyncStatus {
            root: root.to_path_buf(),
            successes: inner.successes,
            consecutive_failures: inner.failure_count,
            last_output: inner.last_output.clone(),
            last_error: inner.last_error.clone(),
            seconds_since_success: inner.last_success.map(|t| t.elapsed().as_secs()),
        }
    }
}

/// Point-in-time view of one sync task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub root: PathBuf,
    pub successes: u64,
    pub consecutive_failures: u32,
    pub last_output: Option<String>,
    pub last_error: Option<String>,
    pub seconds_since_success: Option<u64>,
}
