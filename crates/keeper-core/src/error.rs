//! Error types for String Keeper.
//!
//! Every failure the request path can produce is a variant of
//! [`KeeperError`]. Variants carry structured context; translating a
//! variant into a transport status is left to the boundary layer.
//!
//! # Example
//!
//! ```
//! use keeper_core::KeeperError;
//!
//! let error = KeeperError::invalid_request("namespace/bucket/file could not be empty");
//! assert!(error.is_invalid_request());
//! assert_eq!(
//!     error.to_string(),
//!     "invalid request: namespace/bucket/file could not be empty"
//! );
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for String Keeper operations.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// The request is malformed or asks for something the policy forbids.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// The requested file does not exist.
    #[error("file '{}' not exist", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The requested path is a directory, not a regular file.
    #[error("the request file of {} is a dir", path.display())]
    IsDirectory {
        /// Path that was requested
        path: PathBuf,
    },

    /// A revision was requested for a subtree without a repository.
    #[error(
        "the file is not in git dir {}, could not use revision to pick file",
        path.display()
    )]
    NotVersionControlled {
        /// Candidate repository root that was probed
        path: PathBuf,
    },

    /// The external version-control tool exited unsuccessfully.
    #[error("git {operation} failed: {diagnostic}")]
    Upstream {
        /// Operation that was attempted (e.g. `cat-file`)
        operation: String,
        /// Captured tool output and exit status
        diagnostic: String,
    },

    /// The external version-control tool did not finish in time.
    #[error("git {operation} timed out after {seconds}s")]
    Timeout {
        /// Operation that was attempted
        operation: String,
        /// Configured timeout
        seconds: u64,
    },

    /// A filesystem operation failed for a reason other than absence.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Variable substitution failed.
    #[error("template error: {reason}")]
    Template {
        /// Description of the rendering failure
        reason: String,
    },
}

impl KeeperError {
    /// Creates an invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an is-a-directory error.
    pub fn is_directory(path: impl Into<PathBuf>) -> Self {
        Self::IsDirectory { path: path.into() }
    }

    /// Creates a not-version-controlled error for a repository root.
    pub fn not_version_controlled(path: impl Into<PathBuf>) -> Self {
        Self::NotVersionControlled { path: path.into() }
    }

    /// Creates an upstream failure from a tool diagnostic.
    pub fn upstream(operation: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Creates an I/O error bound to the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a template error.
    pub fn template(reason: impl Into<String>) -> Self {
        Self::Template {
            reason: reason.into(),
        }
    }

    /// Returns true if this is an invalid request error.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    /// Returns true if the requested file was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the subtree was classified as not version-controlled.
    pub fn is_not_version_controlled(&self) -> bool {
        matches!(self, Self::NotVersionControlled { .. })
    }

    /// Returns true if the external tool failed or timed out.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Timeout { .. })
    }
}

/// Result alias used throughout String Keeper.
pub type Result<T> = std::result::Result<T, KeeperError>;
