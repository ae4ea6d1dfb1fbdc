//! Cache key for revision content.

use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies one blob: a path inside a repository at a revision.
///
/// The components are kept as separate fields, so two keys can only be
/// equal if every component is equal; no separator can make them collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RevisionKey {
    repo_root: PathBuf,
    revision: String,
    path: String,
}

impl RevisionKey {
    /// Creates a key for `revision:path` inside `repo_root`.
    pub fn new(
        repo_root: impl Into<PathBuf>,
        revision: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            revision: revision.into(),
            path: path.into(),
        }
    }

    /// Returns the repository root.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Returns the revision.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Returns the path relative to the repository root.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.revision, self.path)
    }
}
