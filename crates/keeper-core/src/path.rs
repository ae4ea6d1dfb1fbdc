//! Sandbox-confined path resolution.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{KeeperError, Result};

/// A request path that has been validated against the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute path of the requested file.
    pub file: PathBuf,
    /// Directory containing the file.
    pub dir: PathBuf,
    /// `root/namespace/bucket`.
    pub bucket_root: PathBuf,
}

/// Maps `(namespace, bucket, file)` onto a path under the sandbox root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for the given sandbox root.
    ///
    /// The root is canonicalized once here; it must exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|e| KeeperError::io(root, e))?;
        Ok(Self { root })
    }

    /// Returns the canonical sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the candidate path and checks it without touching the filesystem.
    ///
    /// Rejects absolute segments, any `..` or `./` in the joined request path,
    /// and anything that does not end up beneath the sandbox root.
    pub fn candidate(&self, namespace: &str, bucket: &str, file: &str) -> Result<PathBuf> {
        for segment in [namespace, bucket, file] {
            if Path::new(segment).has_root() {
                return Err(KeeperError::invalid_request(
                    "request data contains denied string",
                ));
            }
        }

        let joined = Path::new(namespace).join(bucket).join(file);
        let text = joined.to_string_lossy();
        if text.contains("..") || text.contains("./") {
            return Err(KeeperError::invalid_request(
                "request data contains denied string",
            ));
        }

        let candidate = self.root.join(&joined);
        if !candidate.starts_with(&self.root) {
            return Err(KeeperError::invalid_request(format!(
                "path {} is outside of the sandbox",
                joined.display()
            )));
        }

        Ok(candidate)
    }

    /// Resolves a request to an existing regular file inside the sandbox.
    pub async fn resolve(&self, namespace: &str, bucket: &str, file: &str) -> Result<ResolvedPath> {
        let candidate = self.candidate(namespace, bucket, file)?;

        let metadata = match tokio::fs::metadata(&candidate).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KeeperError::not_found(display_path(namespace, bucket, file)));
            },
            Err(e) => return Err(KeeperError::io(&candidate, e)),
        };

        if metadata.is_dir() {
            return Err(KeeperError::is_directory(display_path(
                namespace, bucket, file,
            )));
        }

        let dir = candidate
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        Ok(ResolvedPath {
            bucket_root: self.root.join(namespace).join(bucket),
            dir,
            file: candidate,
        })
    }
}

// Errors echo the request path, never the host layout.
fn display_path(namespace: &str, bucket: &str, file: &str) -> PathBuf {
    Path::new(namespace).join(bucket).join(file)
}
