//! Job rendering and submission.

use tracing::{debug, error, info};

use skytest_core::cluster::{ClusterBackend, JobRequest};
use skytest_core::error::{Result, TestError};
use skytest_core::spec::TestSpec;

use crate::settings::ClusterSettings;

/// Renders a parameterized job from the transformed specification and
/// applies it to the cluster.
pub struct JobSubmitter<'a> {
    cluster: &'a dyn ClusterBackend,
    settings: &'a ClusterSettings,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(cluster: &'a dyn ClusterBackend, settings: &'a ClusterSettings) -> Self {
        Self { cluster, settings }
    }

    /// Submit the job described by `spec`, with each worker executing
    /// `remote_spec` via the rendered command line.
    ///
    /// Identity and replica count come from the original specification;
    /// completions and parallelism are always equal.
    pub async fn submit(&self, spec: &TestSpec, remote_spec: &TestSpec) -> Result<()> {
        let name = spec
            .agent
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| TestError::InvalidSpec("agent.id must be set before submission".to_string()))?;

        let command = worker_command(remote_spec);
        debug!(command = %command, "worker command");

        let request = JobRequest {
            name,
            command,
            completions: spec.agent.count,
            parallelism: spec.agent.count,
            template: self.settings.template_for(spec.wants_avoidance()).to_path_buf(),
        };

        info!(job_id = %request.name, replicas = request.completions, "creating cluster job");
        let output = self.cluster.apply_job(&request).await?;
        if output.success() {
            return Ok(());
        }

        error!(job_id = %request.name, code = output.exit_code, "job submission failed");
        if !output.stdout.is_empty() {
            error!(stdout = %output.stdout, "submission stdout");
        }
        if !output.stderr.is_empty() {
            error!(stderr = %output.stderr, "submission stderr");
        }
        Err(TestError::Submission {
            code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Render the worker entry-point command line from a transformed spec.
pub fn worker_command(spec: &TestSpec) -> String {
    let mut parts = vec!["skytest".to_string(), "exec".to_string()];

    if let Some(simulation) = &spec.simulation {
        parts.push(format!("--simulator {}", simulation.simulator.name()));
        if let Some(world) = &simulation.world {
            parts.push(format!("--world {world}"));
        }
        if simulation.headless {
            parts.push("--headless".to_string());
        }
    }
    if let Some(drone) = &spec.drone {
        if let Some(mission) = &drone.mission_file {
            parts.push(format!("--mission {mission}"));
        }
        if let Some(params) = &drone.params_file {
            parts.push(format!("--params {params}"));
        }
    }
    if let Some(test) = &spec.test {
        if let Some(commands) = &test.commands_file {
            parts.push(format!("--commands {commands}"));
        }
    }
    if let Some(assertion) = &spec.assertion {
        if let Some(log) = &assertion.log_file {
            parts.push(format!("--log {log}"));
        }
    }
    if let Some(path) = &spec.agent.path {
        parts.push(format!("--output {path}"));
    }

    parts.join(" ")
}
