#![allow(dead_code)]
use std::path::Path;

use keeper_core::PathResolver;
use tempfile::TempDir;

/// Writes `content` at `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture dirs");
    }
    std::fs::write(path, content).expect("Failed to write fixture file");
}

/// Returns a sandbox laid out as `root/namespace/bucket/[subdir/]file`.
pub fn sandbox() -> (TempDir, PathResolver) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_file(dir.path(), "acme/site1/index.conf", "listen {{port}}");
    write_file(dir.path(), "acme/site1/templates/a.txt", "hello {{name}}");
    write_file(dir.path(), "acme/site2/b.txt", "bucket two");
    let resolver = PathResolver::new(dir.path()).expect("Failed to create resolver");
    (dir, resolver)
}
