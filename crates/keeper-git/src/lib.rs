//! # Keeper Git
//!
//! Revision resolution for String Keeper.
//!
//! Given a request for a file at a revision, this crate finds the working
//! copy that holds the file, reads the blob through the system `git`
//! binary, caches it for the lifetime of the process and keeps every
//! discovered working copy up to date in the background.
//!
//! ## Features
//!
//! - Repository discovery limited to first-level bucket subdirectories
//! - `git cat-file` / `git pull` with per-invocation timeouts
//! - Unbounded, coalescing revision cache
//! - One supervised refresh loop per repository, stopped on shutdown
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use keeper_git::{GitCli, KeeperBackend, SyncConfig};
//! use keeper_core::StringRequest;
//!
//! let backend = KeeperBackend::new("public", Arc::new(GitCli::new()), SyncConfig::default())?;
//!
//! let request = StringRequest::new("acme", "site1", "templates/a.txt")
//!     .with_revision("abc123")
//!     .with_var("name", "world");
//! let body = backend.fetch(request).await?;
//!
//! backend.shutdown().await;
//! ```

pub mod backend;
pub mod cache;
pub mod error;
pub mod repository;
pub mod source;
pub mod sync;

// Re-exports
pub use backend::KeeperBackend;
pub use cache::{RevisionCache, RevisionKey};
pub use error::GitError;
pub use repository::{GitCli, ManagedFile, RepositoryLocator};
pub use source::ObjectStore;
pub use sync::{SyncConfig, SyncScheduler, SyncState, SyncStatus};

// Re-export keeper_core for consumers
pub use keeper_core;
