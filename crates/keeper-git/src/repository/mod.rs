//! Repository discovery and `git` access.
//!
//! This module classifies bucket subtrees as working copies and talks to
//! the `git` binary on their behalf.

mod git_ops;
mod locator;

pub use git_ops::{DEFAULT_GIT_TIMEOUT, GitCli};
pub use locator::{ManagedFile, RepositoryLocator};
