//! Cluster contract: manifest apply and terminal-condition waits.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::exec::ExecOutput;

/// Terminal condition a wait can block on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
    /// The job completed successfully.
    Complete,

    /// The job failed.
    Failed,
}

impl WaitCondition {
    /// Condition name as used by `kubectl wait --for=condition=...`.
    pub fn name(&self) -> &'static str {
        match self {
            WaitCondition::Complete => "complete",
            WaitCondition::Failed => "failed",
        }
    }
}

/// Terminal state observed for a submitted job.
///
/// Exactly one is reached per job; the watcher reports whichever terminal
/// condition resolved first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    Succeeded,
    Failed,
}

/// Inputs for patching and applying a job manifest template.
///
/// `completions` and `parallelism` are always equal: a job is N independent
/// copies of the same worker, never a staged or partial-completion job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Job name (the agent identifier).
    pub name: String,

    /// Worker entry-point command line.
    pub command: String,

    /// Number of worker completions required.
    pub completions: u32,

    /// Number of workers run in parallel.
    pub parallelism: u32,

    /// Manifest template to patch.
    pub template: PathBuf,
}

/// An in-flight terminal-condition wait.
///
/// Supports external termination so the losing side of the watch race can
/// be torn down once the race is decided.
#[async_trait]
pub trait WaitHandle: Send {
    /// Block until the condition holds or the wait's timeout elapses.
    /// Returns the wait's exit code (0 = condition observed).
    async fn wait(&mut self) -> Result<i32>;

    /// Terminate the in-flight wait.
    async fn kill(&mut self) -> Result<()>;
}

/// Cluster operations consumed by the orchestrator.
#[async_trait]
pub trait ClusterBackend: Send + Sync {
    /// Patch the job template with the request fields and apply it
    /// declaratively. The exit status decides submission success; output
    /// streams are surfaced for diagnostics.
    async fn apply_job(&self, request: &JobRequest) -> Result<ExecOutput>;

    /// Start a blocking wait for one terminal condition of the job.
    async fn start_wait(
        &self,
        job_id: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Box<dyn WaitHandle>>;
}
