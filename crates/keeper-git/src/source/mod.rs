//! Object store abstraction.
//!
//! This module defines the [`ObjectStore`] trait that the revision resolver
//! and the sync scheduler use to reach the version-control tool.

mod traits;

pub use traits::ObjectStore;
