//! Background refresh scheduling, one task per repository root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{SyncState, SyncStatus};
use crate::source::ObjectStore;

/// Configuration for the sync scheduler.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause between refreshes of one repository.
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

/// A running sync loop and the means to stop it.
struct SyncTask {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
    state: Arc<SyncState>,
}

#[derive(Default)]
struct Registry {
    tasks: HashMap<PathBuf, SyncTask>,
    closed: bool,
}

/// Supervises one perpetual refresh loop per repository root.
///
/// Loops are started lazily with [`ensure_started`](Self::ensure_started)
/// and stopped together with [`shutdown`](Self::shutdown). A failing
/// refresh is logged and recorded, never escalated.
pub struct SyncScheduler {
    store: Arc<dyn ObjectStore>,
    config: SyncConfig,
    registry: Mutex<Registry>,
}

impl SyncScheduler {
    /// Creates a scheduler that refreshes through `store`.
    pub fn new(store: Arc<dyn ObjectStore>, config: SyncConfig) -> Self {
        Self {
            store,
            config,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Starts the refresh loop for `root` unless one already exists.
    ///
    /// Returns true if a loop was started by this call. Must be called
    /// from within a tokio runtime.
    pub fn ensure_started(&self, root: &Path) -> bool {
        let mut registry = self.registry.lock();

        if registry.closed {
            warn!(repo = %root.display(), "Scheduler is shut down, not starting sync");
            return false;
        }
        if registry.tasks.contains_key(root) {
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(SyncState::new());
        let join = tokio::spawn(run_sync_loop(
            root.to_path_buf(),
            Arc::clone(&self.store),
            Arc::clone(&state),
            self.config.interval,
            shutdown_rx,
        ));

        registry.tasks.insert(
            root.to_path_buf(),
            SyncTask {
                shutdown_tx,
                join,
                state,
            },
        );
        counter!("keeper_sync_tasks_started_total").increment(1);
        info!(repo = %root.display(), "Started repository sync");

        true
    }

    /// Returns true if a loop is registered for `root`.
    pub fn is_running(&self, root: &Path) -> bool {
        self.registry.lock().tasks.contains_key(root)
    }

    /// Returns the number of registered loops.
    pub fn len(&self) -> usize {
        self.registry.lock().tasks.len()
    }

    /// Returns true if no loop is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the registered repository roots, sorted.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<_> = self.registry.lock().tasks.keys().cloned().collect();
        roots.sort();
        roots
    }

    /// Returns a diagnostic snapshot of every loop, sorted by root.
    pub fn status(&self) -> Vec<SyncStatus> {
        let mut status: Vec<_> = self
            .registry
            .lock()
            .tasks
            .iter()
            .map(|(root, task)| task.state.snapshot(root))
            .collect();
        status.sort_by(|a, b| a.root.cmp(&b.root));
        status
    }

    /// Stops every loop and waits for all of them to finish.
    ///
    /// Later calls to `ensure_started` are refused.
    pub async fn shutdown(&self) {
        let tasks: Vec<_> = {
            let mut registry = self.registry.lock();
            registry.closed = true;
            registry.tasks.drain().collect()
        };

        for task in tasks.iter().map(|(_, task)| task) {
            let _ = task.shutdown_tx.send(true);
        }

        let count = tasks.len();
        for (root, task) in tasks {
            if let Err(e) = task.join.await {
                warn!(repo = %root.display(), "Sync task ended abnormally: {}", e);
            }
        }

        info!("Stopped {} repository sync task(s)", count);
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        for task in self.registry.get_mut().tasks.values() {
            let _ = task.shutdown_tx.send(true);
        }
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("store", &self.store.name())
            .field("interval", &self.config.interval)
            .field("roots", &self.roots())
            .finish()
    }
}

/// Refreshes `root` until told to stop.
///
/// The pause starts once a refresh has finished, so a slow pull never
/// shortens the rest before the next one.
async fn run_sync_loop(
    root: PathBuf,
    store: Arc<dyn ObjectStore>,
    state: Arc<SyncState>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!(repo = %root.display(), "Sync loop running every {:?}", period);

    loop {
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = async {
                refresh_once(&root, store.as_ref(), &state).await;
                sleep(period).await;
            } => {}
        }
    }

    info!(repo = %root.display(), "Repository sync shutting down");
}

async fn refresh_once(root: &Path, store: &dyn ObjectStore, state: &SyncState) {
    match store.refresh(root).await {
        Ok(output) => {
            info!(repo = %root.display(), "{}", output);
            state.record_success(output);
            counter!("keeper_sync_refresh_total", "outcome" => "success").increment(1);
        },
        Err(e) => {
            warn!(repo = %root.display(), "Refresh failed: {}", e);
            state.record_failure(e.diagnostic());
            counter!("keeper_sync_refresh_total", "outcome" => "failure").increment(1);
        },
    }
}
