//! File transfer over a shared mounted volume.
//!
//! Submitter and workers mount the same volume at the same path, so remote
//! references are plain paths on that mount and transfer is a filesystem
//! copy.

use std::path::Path;

use async_trait::async_trait;

use skytest_core::error::{Result, TestError};
use skytest_core::transfer::{FileStore, RemoteFileRef};

/// `FileStore` backed by a shared filesystem mount.
#[derive(Debug, Default)]
pub struct SharedDirStore;

impl SharedDirStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for SharedDirStore {
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<RemoteFileRef> {
        let file_name = local
            .file_name()
            .ok_or_else(|| TestError::Upload {
                path: local.display().to_string(),
                reason: "path has no file name".to_string(),
            })?
            .to_string_lossy()
            .to_string();

        let remote_root = Path::new(remote_dir);
        tokio::fs::create_dir_all(remote_root)
            .await
            .map_err(|err| upload_err(local, &err))?;
        let dest = remote_root.join(&file_name);
        tokio::fs::copy(local, &dest)
            .await
            .map_err(|err| upload_err(local, &err))?;

        Ok(RemoteFileRef::new(dest.display().to_string()))
    }

    async fn download_dir(&self, remote_dir: &str, local_dir: &Path) -> Result<()> {
        let mut entries = tokio::fs::read_dir(remote_dir)
            .await
            .map_err(|err| download_err(remote_dir, &err))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| download_err(remote_dir, &err))?
        {
            let path = entry.path();
            if path.is_file() {
                let dest = local_dir.join(entry.file_name());
                tokio::fs::copy(&path, &dest)
                    .await
                    .map_err(|err| download_err(remote_dir, &err))?;
            }
        }
        Ok(())
    }
}

fn upload_err(local: &Path, err: &std::io::Error) -> TestError {
    TestError::Upload {
        path: local.display().to_string(),
        reason: err.to_string(),
    }
}

fn download_err(remote_dir: &str, err: &std::io::Error) -> TestError {
    TestError::Download {
        remote: remote_dir.to_string(),
        reason: err.to_string(),
    }
}
