//! File transfer contract against the job's shared output location.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Handle to a file visible to remote workers.
///
/// Produced by [`FileStore::upload`]; opaque to the orchestrator beyond
/// being substitutable in place of a local path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRef(String);

impl RemoteFileRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RemoteFileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transfer of files to and from the shared storage location.
///
/// Guarantees:
/// - `upload` places the file where workers resolving the returned
///   reference will find it.
/// - `download_dir` materializes every entry of `remote_dir` under
///   `local_dir`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload a local file into a remote directory, returning the remote
    /// reference to substitute for the local path.
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<RemoteFileRef>;

    /// Download the contents of a remote directory into a local one.
    async fn download_dir(&self, remote_dir: &str, local_dir: &Path) -> Result<()>;
}
