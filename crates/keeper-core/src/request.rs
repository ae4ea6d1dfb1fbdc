//! Inbound string requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{KeeperError, Result};

/// Substitution variables supplied by the caller.
pub type Variables = Map<String, Value>;

/// A request for one string resource.
///
/// Mirrors the JSON body accepted by `POST /`:
///
/// ```
/// use keeper_core::StringRequest;
///
/// let request: StringRequest = serde_json::from_str(
///     r#"{"namespace":" acme ","bucket":"site1","file":"a.txt","envs":{"name":"world"}}"#,
/// ).unwrap();
/// let request = request.normalized().unwrap();
/// assert_eq!(request.namespace, "acme");
/// assert!(request.revision().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringRequest {
    pub namespace: String,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    pub file: String,
    pub envs: Variables,
    pub raw_data: bool,
}

impl StringRequest {
    /// Creates a request for the current content of a file.
    pub fn new(
        namespace: impl Into<String>,
        bucket: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            bucket: bucket.into(),
            file: file.into(),
            ..Self::default()
        }
    }

    /// Sets the revision to read the file at.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Adds a substitution variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.envs.insert(name.into(), value.into());
        self
    }

    /// Requests the content without variable substitution.
    pub fn raw(mut self) -> Self {
        self.raw_data = true;
        self
    }

    /// Trims the addressing fields and checks that none is empty.
    ///
    /// A blank revision is dropped so that it reads as "current content".
    pub fn normalized(mut self) -> Result<Self> {
        self.namespace = self.namespace.trim().to_string();
        self.bucket = self.bucket.trim().to_string();
        self.file = self.file.trim().to_string();
        self.revision = self
            .revision
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        if self.namespace.is_empty() || self.bucket.is_empty() || self.file.is_empty() {
            return Err(KeeperError::invalid_request(
                "namespace/bucket/file could not be empty",
            ));
        }

        Ok(self)
    }

    /// Returns the requested revision, if any.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref().filter(|r| !r.is_empty())
    }

    /// Returns the `namespace/bucket` pair, used as the account name.
    pub fn bucket_account(&self) -> String {
        format!("{}/{}", self.namespace, self.bucket)
    }
}

/// Checks that a revision can be safely passed to `git` as `<rev>:<path>`.
pub fn validate_revision(revision: &str) -> Result<()> {
    if revision.starts_with('-') {
        return Err(KeeperError::invalid_request(format!(
            "revision '{revision}' cannot start with '-'"
        )));
    }
    if revision.contains(':') {
        return Err(KeeperError::invalid_request(format!(
            "revision '{revision}' cannot contain ':'"
        )));
    }
    if revision.chars().any(|c| c.is_control()) {
        return Err(KeeperError::invalid_request(
            "revision cannot contain control characters",
        ));
    }
    Ok(())
}
