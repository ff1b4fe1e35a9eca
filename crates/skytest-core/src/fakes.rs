//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `MemoryFileStore` and `FakeCluster` that satisfy the trait
//! contracts without a shared volume or a cluster.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::cluster::{ClusterBackend, JobRequest, WaitCondition, WaitHandle};
use crate::error::{Result, TestError};
use crate::exec::ExecOutput;
use crate::transfer::{FileStore, RemoteFileRef};

// ---------------------------------------------------------------------------
// MemoryFileStore
// ---------------------------------------------------------------------------

/// In-memory file store that records uploads and replays scripted downloads.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    uploads: Mutex<Vec<(PathBuf, String)>>,
    download_files: Mutex<Vec<(String, Vec<u8>)>>,
    fail_uploads: bool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files (name, contents) that `download_dir` will materialize.
    pub fn with_download_files(files: Vec<(&str, &[u8])>) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            download_files: Mutex::new(
                files
                    .into_iter()
                    .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
                    .collect(),
            ),
            fail_uploads: false,
        }
    }

    /// Make every upload fail, for abort-path tests.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Recorded `(local path, remote directory)` upload pairs.
    pub fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(&self, local: &Path, remote_dir: &str) -> Result<RemoteFileRef> {
        if self.fail_uploads {
            return Err(TestError::Upload {
                path: local.display().to_string(),
                reason: "store unavailable".to_string(),
            });
        }
        let file_name = local
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| TestError::Upload {
                path: local.display().to_string(),
                reason: "path has no file name".to_string(),
            })?;
        self.uploads
            .lock()
            .unwrap()
            .push((local.to_path_buf(), remote_dir.to_string()));
        Ok(RemoteFileRef::new(format!(
            "{}/{}",
            remote_dir.trim_end_matches('/'),
            file_name
        )))
    }

    async fn download_dir(&self, _remote_dir: &str, local_dir: &Path) -> Result<()> {
        let files = self.download_files.lock().unwrap().clone();
        for (name, bytes) in files {
            std::fs::write(local_dir.join(name), bytes)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakeCluster
// ---------------------------------------------------------------------------

/// Scripted outcome for one terminal-condition wait.
#[derive(Debug, Clone)]
pub struct ScriptedWait {
    /// Exit code of the wait once it resolves; `None` never resolves.
    pub exit_code: Option<i32>,

    /// Delay before resolution.
    pub delay: Duration,
}

impl ScriptedWait {
    pub fn resolves(exit_code: i32) -> Self {
        Self {
            exit_code: Some(exit_code),
            delay: Duration::ZERO,
        }
    }

    pub fn resolves_after(exit_code: i32, delay: Duration) -> Self {
        Self {
            exit_code: Some(exit_code),
            delay,
        }
    }

    pub fn pends() -> Self {
        Self {
            exit_code: None,
            delay: Duration::ZERO,
        }
    }
}

/// In-memory cluster that records applied jobs and scripts the wait race.
pub struct FakeCluster {
    applied: Mutex<Vec<JobRequest>>,
    apply_output: ExecOutput,
    complete: ScriptedWait,
    failed: ScriptedWait,
    complete_killed: Arc<AtomicBool>,
    failed_killed: Arc<AtomicBool>,
    kill_fails: bool,
}

impl FakeCluster {
    pub fn new(complete: ScriptedWait, failed: ScriptedWait) -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            apply_output: ExecOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            },
            complete,
            failed,
            complete_killed: Arc::new(AtomicBool::new(false)),
            failed_killed: Arc::new(AtomicBool::new(false)),
            kill_fails: false,
        }
    }

    /// Cluster whose job completes cleanly.
    pub fn completing() -> Self {
        Self::new(ScriptedWait::resolves(0), ScriptedWait::pends())
    }

    /// Cluster whose job reaches the failure condition.
    pub fn failing() -> Self {
        Self::new(ScriptedWait::pends(), ScriptedWait::resolves(0))
    }

    /// Script the apply outcome.
    pub fn with_apply_output(mut self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.apply_output = ExecOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };
        self
    }

    /// Make `kill` on wait handles return an error.
    pub fn with_failing_kills(mut self) -> Self {
        self.kill_fails = true;
        self
    }

    /// Jobs applied so far.
    pub fn applied(&self) -> Vec<JobRequest> {
        self.applied.lock().unwrap().clone()
    }

    /// Whether the success-condition wait was killed.
    pub fn complete_wait_killed(&self) -> bool {
        self.complete_killed.load(Ordering::SeqCst)
    }

    /// Whether the failure-condition wait was killed.
    pub fn failed_wait_killed(&self) -> bool {
        self.failed_killed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterBackend for FakeCluster {
    async fn apply_job(&self, request: &JobRequest) -> Result<ExecOutput> {
        self.applied.lock().unwrap().push(request.clone());
        Ok(self.apply_output.clone())
    }

    async fn start_wait(
        &self,
        _job_id: &str,
        condition: WaitCondition,
        _timeout: Duration,
    ) -> Result<Box<dyn WaitHandle>> {
        let (script, killed) = match condition {
            WaitCondition::Complete => (self.complete.clone(), self.complete_killed.clone()),
            WaitCondition::Failed => (self.failed.clone(), self.failed_killed.clone()),
        };
        Ok(Box::new(FakeWaitHandle {
            script,
            killed,
            kill_fails: self.kill_fails,
        }))
    }
}

struct FakeWaitHandle {
    script: ScriptedWait,
    killed: Arc<AtomicBool>,
    kill_fails: bool,
}

#[async_trait]
impl WaitHandle for FakeWaitHandle {
    async fn wait(&mut self) -> Result<i32> {
        if self.script.delay > Duration::ZERO {
            tokio::time::sleep(self.script.delay).await;
        }
        match self.script.exit_code {
            Some(code) => Ok(code),
            None => futures::future::pending().await,
        }
    }

    async fn kill(&mut self) -> Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        if self.kill_fails {
            return Err(TestError::Wait("kill refused".to_string()));
        }
        Ok(())
    }
}
