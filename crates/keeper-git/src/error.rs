//! Error types for version-control operations.

use keeper_core::KeeperError;

/// Errors raised while talking to the external `git` tool.
///
/// Cloneable so a single failure can be shared between callers that
/// coalesced on the same cache miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GitError {
    /// The tool ran but exited unsuccessfully.
    #[error("git {operation} failed: {diagnostic}")]
    CommandFailed {
        operation: String,
        diagnostic: String,
    },

    /// The tool did not finish within the configured timeout.
    #[error("git {operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// The tool could not be started at all.
    #[error("failed to run git {operation}: {reason}")]
    Spawn { operation: String, reason: String },
}

impl GitError {
    /// Creates a command failure error.
    pub fn failed(operation: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Returns the operation that failed.
    pub fn operation(&self) -> &str {
        match self {
            Self::CommandFailed { operation, .. }
            | Self::Timeout { operation, .. }
            | Self::Spawn { operation, .. } => operation,
        }
    }

    /// Returns the diagnostic text carried by this error.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::CommandFailed { diagnostic, .. } => diagnostic.clone(),
            other => other.to_string(),
        }
    }
}

impl From<GitError> for KeeperError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::Timeout { operation, seconds } => KeeperError::Timeout { operation, seconds },
            GitError::CommandFailed {
                operation,
                diagnostic,
            } => KeeperError::Upstream {
                operation,
                diagnostic,
            },
            GitError::Spawn { operation, reason } => KeeperError::Upstream {
                operation,
                diagnostic: reason,
            },
        }
    }
}
