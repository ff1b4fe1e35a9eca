//! Artifact harvesting and result construction.

use std::path::Path;

use tracing::{debug, error, info};

use skytest_core::error::{Result, TestError};
use skytest_core::result::{is_result_log, TestResult};
use skytest_core::transfer::FileStore;

/// Downloads a job's output directory and builds the validated result set.
pub struct ResultCollector<'a> {
    store: &'a dyn FileStore,
}

impl<'a> ResultCollector<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        Self { store }
    }

    /// Download `remote_dir` into `dest` and classify the entries.
    ///
    /// `dest` must not already exist; a collision is a hard failure rather
    /// than a merge. Entries qualify when they carry the simulation-log
    /// extension and are not the configured baseline log. An empty result
    /// set is always an error, never a valid "no output" outcome.
    pub async fn collect(
        &self,
        job_id: &str,
        remote_dir: &str,
        dest: &Path,
        baseline: Option<&str>,
    ) -> Result<Vec<TestResult>> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if let Err(err) = tokio::fs::create_dir(dest).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                return Err(TestError::DestinationCollision {
                    path: dest.to_path_buf(),
                });
            }
            return Err(err.into());
        }

        info!(job_id = %job_id, dest = %dest.display(), "downloading simulation logs");
        self.store.download_dir(remote_dir, dest).await?;
        debug!(job_id = %job_id, "files downloaded");

        let mut results = Vec::new();
        let mut entries = tokio::fs::read_dir(dest).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_result_log(&path, baseline) {
                results.push(TestResult::new(path));
            }
        }

        if results.is_empty() {
            error!(job_id = %job_id, "cluster job produced no simulation logs");
            return Err(TestError::EmptyResult {
                job_id: job_id.to_string(),
            });
        }
        Ok(results)
    }
}
