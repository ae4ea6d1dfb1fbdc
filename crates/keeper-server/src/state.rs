//! Application state.

use std::sync::Arc;

use keeper_git::KeeperBackend;

use crate::config::AclConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<KeeperBackend>,
    acl: Arc<AclConfig>,
}

impl AppState {
    /// Creates a new AppState around a backend and its access rules.
    pub fn new(backend: Arc<KeeperBackend>, acl: AclConfig) -> Self {
        Self {
            backend,
            acl: Arc::new(acl),
        }
    }

    /// Returns the string backend.
    pub fn backend(&self) -> &KeeperBackend {
        &self.backend
    }

    /// Returns the access rules.
    pub fn acl(&self) -> &AclConfig {
        &self.acl
    }
}
