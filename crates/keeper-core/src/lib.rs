//! # Keeper Core
//!
//! Domain types shared by the String Keeper crates: the inbound
//! [`StringRequest`], the [`KeeperError`] hierarchy, sandbox-confined path
//! resolution and the [`Renderer`] used for variable substitution.

pub mod error;
pub mod path;
pub mod request;
pub mod template;

pub use error::{KeeperError, Result};
pub use path::{PathResolver, ResolvedPath};
pub use request::{StringRequest, Variables, validate_revision};
pub use template::{PlaceholderRenderer, Renderer};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
