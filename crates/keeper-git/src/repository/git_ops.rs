//! Object store operations using the system `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;
use crate::source::ObjectStore;

/// Default per-invocation timeout.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// An [`ObjectStore`] backed by the `git` command line tool.
///
/// Every invocation runs with `-C <repo_root>`, never prompts for
/// credentials and is killed if it outlives the configured timeout.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Creates a client using `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("git"),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    /// Uses a specific `git` binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `git -C <repo_root> <args>` and returns its output on success.
    async fn run(
        &self,
        repo_root: &Path,
        operation: &str,
        args: &[&str],
    ) -> Result<Output, GitError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-C")
            .arg(repo_root)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(repo = %repo_root.display(), ?args, "Running git {}", operation);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(GitError::Spawn {
                    operation: operation.to_string(),
                    reason: e.to_string(),
                });
            },
            Err(_) => {
                return Err(GitError::Timeout {
                    operation: operation.to_string(),
                    seconds: self.timeout.as_secs(),
                });
            },
        };

        if !output.status.success() {
            return Err(GitError::failed(operation, diagnostic(&output)));
        }

        Ok(output)
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for GitCli {
    async fn fetch_blob(
        &self,
        repo_root: &Path,
        rel_path: &str,
        revision: &str,
    ) -> Result<Vec<u8>, GitError> {
        let object = format!("{revision}:{rel_path}");
        let output = self
            .run(repo_root, "cat-file", &["cat-file", "blob", &object])
            .await?;
        Ok(output.stdout)
    }

    async fn refresh(&self, repo_root: &Path) -> Result<String, GitError> {
        let output = self.run(repo_root, "pull", &["pull"]).await?;
        Ok(combined_text(&output))
    }

    async fn status(&self, repo_root: &Path) -> Result<String, GitError> {
        let output = self
            .run(repo_root, "status", &["status", "--short"])
            .await?;
        Ok(combined_text(&output))
    }

    fn name(&self) -> &str {
        "git"
    }
}

/// Joins stdout and stderr the way a terminal would show them.
fn combined_text(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut text = stdout.trim().to_string();
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(stderr);
    }
    text
}

/// Captured output followed by the exit status.
fn diagnostic(output: &Output) -> String {
    let text = combined_text(output);
    if text.is_empty() {
        output.status.to_string()
    } else {
        format!("{}\n{}", text, output.status)
    }
}
