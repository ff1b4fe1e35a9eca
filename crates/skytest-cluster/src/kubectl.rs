//! kubectl-backed cluster operations.
//!
//! Submission patches a job manifest template with `yq` and pipes it into
//! `kubectl apply`; terminal-condition waits are `kubectl wait` children
//! that can be killed once the race resolves.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Child;
use tracing::debug;

use skytest_core::cluster::{ClusterBackend, JobRequest, WaitCondition, WaitHandle};
use skytest_core::error::{Result, TestError};
use skytest_core::exec::{run_shell, spawn_shell, ExecOutput};

/// `ClusterBackend` implementation over the `yq` and `kubectl` CLIs.
#[derive(Debug, Default)]
pub struct KubectlCluster;

impl KubectlCluster {
    pub fn new() -> Self {
        Self
    }
}

/// Render the yq patch + kubectl apply pipeline for a job request.
///
/// The manifest is applied declaratively; schema validation is disabled
/// since the patched template is trusted.
pub fn apply_command(request: &JobRequest) -> String {
    format!(
        "yq '.metadata.name = \"{name}\" \
         | .spec.template.spec.containers[0].env |= map(select(.name == \"COMMAND\").value=\"{command}\") \
         | .spec.completions={completions} \
         | .spec.parallelism={parallelism}' {template} \
         | kubectl apply -f - --validate=false",
        name = request.name,
        command = request.command,
        completions = request.completions,
        parallelism = request.parallelism,
        template = request.template.display(),
    )
}

/// Render the kubectl wait invocation for one terminal condition.
pub fn wait_command(job_id: &str, condition: WaitCondition, timeout: Duration) -> String {
    format!(
        "kubectl wait --for=condition={} --timeout={}s job.batch/{}",
        condition.name(),
        timeout.as_secs(),
        job_id,
    )
}

#[async_trait]
impl ClusterBackend for KubectlCluster {
    async fn apply_job(&self, request: &JobRequest) -> Result<ExecOutput> {
        let command = apply_command(request);
        debug!(command = %command, "applying job manifest");
        run_shell(&command).await
    }

    async fn start_wait(
        &self,
        job_id: &str,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Box<dyn WaitHandle>> {
        let command = wait_command(job_id, condition, timeout);
        debug!(command = %command, "starting terminal-condition wait");
        let child = spawn_shell(&command)?;
        Ok(Box::new(KubectlWait { child }))
    }
}

/// An in-flight `kubectl wait` child.
struct KubectlWait {
    child: Child,
}

#[async_trait]
impl WaitHandle for KubectlWait {
    async fn wait(&mut self) -> Result<i32> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }

    async fn kill(&mut self) -> Result<()> {
        self.child
            .kill()
            .await
            .map_err(|err| TestError::Wait(err.to_string()))
    }
}
