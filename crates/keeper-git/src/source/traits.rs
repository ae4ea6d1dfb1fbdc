//! Object store trait definition.

use std::path::Path;

use async_trait::async_trait;

use crate::error::GitError;

/// Access to the version-control object store of a working copy.
///
/// Nothing here writes to a repository except `refresh`, which updates the
/// working copy from its upstream.
///
/// # Implementors
///
/// - `GitCli` - shells out to the system `git` binary
///
/// # Example
///
/// ```ignore
/// use keeper_git::{GitError, ObjectStore};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl ObjectStore for Fixed {
///     async fn fetch_blob(&self, _: &Path, _: &str, _: &str) -> Result<Vec<u8>, GitError> {
///         Ok(b"hello".to_vec())
///     }
///
///     async fn refresh(&self, _: &Path) -> Result<String, GitError> {
///         Ok("Already up to date.".into())
///     }
///
///     fn name(&self) -> &str {
///         "fixed"
///     }
/// }
/// ```
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the content of the blob addressed by `revision:rel_path`.
    ///
    /// # Errors
    ///
    /// - `GitError::CommandFailed` when the object does not exist or the tool fails
    /// - `GitError::Timeout` when the tool does not finish in time
    async fn fetch_blob(
        &self,
        repo_root: &Path,
        rel_path: &str,
        revision: &str,
    ) -> Result<Vec<u8>, GitError>;

    /// Updates the working copy at `repo_root` from its configured upstream.
    ///
    /// Returns the tool's human-readable output on success.
    async fn refresh(&self, repo_root: &Path) -> Result<String, GitError>;

    /// Returns a short status report of the working copy.
    ///
    /// The default implementation reports that status is unsupported.
    async fn status(&self, repo_root: &Path) -> Result<String, GitError> {
        let _ = repo_root;
        Err(GitError::failed("status", "status is not supported by this store"))
    }

    /// Returns the name of this store, used for logging.
    fn name(&self) -> &str;
}
