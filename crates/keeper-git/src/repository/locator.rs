//! Discovery of version-controlled subtrees inside a bucket.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use keeper_core::KeeperError;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::sync::SyncScheduler;

/// Name of the directory marking a working copy.
const REPO_MARKER: &str = ".git";

/// A file that lives inside a version-controlled subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    /// Root of the working copy: `bucket_root/<first segment>`.
    pub repo_root: PathBuf,
    /// Path of the file relative to `repo_root`, `/`-separated.
    pub rel_path: String,
}

/// Classifies first-level bucket subdirectories as repositories or not.
///
/// Classification is serialized. The cache lookup, the marker check,
/// recording the result and starting the sync loop all happen under one
/// process-wide lock, so each repository root is classified once and gets
/// at most one sync loop.
///
/// [`classify`](Self::classify) blocks on filesystem metadata while holding
/// that lock; async callers should run it on the blocking pool.
pub struct RepositoryLocator {
    classifications: Mutex<HashMap<PathBuf, bool>>,
    scheduler: Arc<SyncScheduler>,
}

impl RepositoryLocator {
    /// Creates a locator that starts sync loops on `scheduler`.
    pub fn new(scheduler: Arc<SyncScheduler>) -> Self {
        Self {
            classifications: Mutex::new(HashMap::new()),
            scheduler,
        }
    }

    /// Locates the repository holding `file`, a path under `bucket_root`.
    ///
    /// Only the first directory below the bucket root is considered as a
    /// repository; files placed directly in the bucket root can never be
    /// read at a revision.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the file sits directly in the bucket root, or
    ///   if the candidate root carries a `.git` entry that is not a directory
    /// - `NotVersionControlled` if the candidate root has no `.git` directory
    pub fn classify(&self, bucket_root: &Path, file: &Path) -> Result<ManagedFile, KeeperError> {
        let not_in_repo = || {
            KeeperError::invalid_request(format!(
                "the file {} is not inside a version-controlled dir",
                file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
            ))
        };

        let file_dir = file.parent().ok_or_else(not_in_repo)?;
        if file_dir == bucket_root {
            return Err(not_in_repo());
        }

        let rel_dir = file_dir.strip_prefix(bucket_root).map_err(|_| not_in_repo())?;
        let segment = match rel_dir.components().next() {
            Some(Component::Normal(segment)) => segment,
            _ => return Err(not_in_repo()),
        };
        let repo_root = bucket_root.join(segment);
        let rel_path = relative_blob_path(&repo_root, file)?;

        let managed = ManagedFile {
            repo_root,
            rel_path,
        };

        let mut classifications = self.classifications.lock();

        match classifications.get(&managed.repo_root) {
            Some(true) => return Ok(managed),
            Some(false) => return Err(KeeperError::not_version_controlled(segment)),
            None => {},
        }

        match std::fs::metadata(managed.repo_root.join(REPO_MARKER)) {
            Err(e) => {
                debug!(
                    repo = %managed.repo_root.display(),
                    "No repository marker: {}", e
                );
                classifications.insert(managed.repo_root.clone(), false);
                Err(KeeperError::not_version_controlled(segment))
            },
            Ok(metadata) if metadata.is_dir() => {
                classifications.insert(managed.repo_root.clone(), true);
                self.scheduler.ensure_started(&managed.repo_root);
                info!(repo = %managed.repo_root.display(), "Discovered repository");
                Ok(managed)
            },
            Ok(_) => {
                // Left unrecorded: the next request checks again.
                warn!(
                    repo = %managed.repo_root.display(),
                    "Repository marker is not a directory"
                );
                Err(KeeperError::invalid_request(format!(
                    "{}/{} is not a directory, could not use revision to pick file",
                    segment.to_string_lossy(),
                    REPO_MARKER
                )))
            },
        }
    }

    /// Returns the recorded classification of a repository root.
    pub fn classification(&self, repo_root: &Path) -> Option<bool> {
        self.classifications.lock().get(repo_root).copied()
    }

    /// Returns the number of classified roots.
    pub fn len(&self) -> usize {
        self.classifications.lock().len()
    }

    /// Returns true if nothing has been classified yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RepositoryLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryLocator")
            .field("classified", &self.len())
            .finish()
    }
}

/// Converts `file` into the `/`-separated path git expects inside `repo_root`.
fn relative_blob_path(repo_root: &Path, file: &Path) -> Result<String, KeeperError> {
    let rel = file
        .strip_prefix(repo_root)
        .map_err(|_| KeeperError::invalid_request("file is outside of its repository"))?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                KeeperError::invalid_request("file path is not valid UTF-8")
            })?),
            _ => return Err(KeeperError::invalid_request("file path is not normalized")),
        }
    }

    Ok(parts.join("/"))
}
