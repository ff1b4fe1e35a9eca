//! Local-to-remote test specification transformation.

use std::path::Path;

use tracing::{debug, info};

use skytest_core::error::{Result, TestError};
use skytest_core::spec::{time_id, AgentEngine, TestSpec};
use skytest_core::transfer::FileStore;
use skytest_core::Command;

/// Produces a remote-executable copy of a test specification.
///
/// Local file references are uploaded to the job's shared output location
/// and replaced with remote references in the returned copy. The caller's
/// specification is left untouched, with one exception: a missing or empty
/// agent identifier is back-filled on the original, so that submission and
/// collection observe the same job id.
pub struct ConfigTransformer<'a> {
    store: &'a dyn FileStore,
}

impl<'a> ConfigTransformer<'a> {
    pub fn new(store: &'a dyn FileStore) -> Self {
        Self { store }
    }

    /// Derive the per-worker copy of `spec`.
    ///
    /// The copy is what each individual worker executes, so its engine is
    /// forced to local single-node execution with one replica; parallelism
    /// lives at the job level.
    pub async fn transform(&self, spec: &mut TestSpec) -> Result<TestSpec> {
        if !spec.agent.has_id() {
            spec.agent.id = Some(time_id());
        }
        let remote_dir = spec
            .agent
            .path
            .clone()
            .ok_or_else(|| TestError::InvalidSpec("agent.path is required for cluster runs".to_string()))?;

        let mut remote = spec.clone();

        if let Some(remote_drone) = remote.drone.as_mut() {
            if let Some(mission) = remote_drone.mission_file.take() {
                remote_drone.mission_file = Some(self.upload(&mission, &remote_dir).await?);
            }
            if let Some(params) = remote_drone.params_file.take() {
                remote_drone.params_file = Some(self.upload(&params, &remote_dir).await?);
            }
        }

        if let Some(remote_test) = remote.test.as_mut() {
            let commands_file = match (&remote_test.commands_file, &remote_test.commands) {
                (Some(existing), _) => Some(existing.clone()),
                (None, Some(commands)) => {
                    Some(self.encode_commands(commands, spec.agent.id.as_deref())?)
                }
                (None, None) => None,
            };
            if let Some(commands_file) = commands_file {
                remote_test.commands_file = Some(self.upload(&commands_file, &remote_dir).await?);
            }
        }

        if let Some(remote_assertion) = remote.assertion.as_mut() {
            if let Some(log) = remote_assertion.log_file.take() {
                remote_assertion.log_file = Some(self.upload(&log, &remote_dir).await?);
            }
        }

        remote.agent.engine = AgentEngine::Local;
        remote.agent.count = 1;

        info!(job_id = spec.agent.id.as_deref().unwrap_or(""), "test inputs uploaded");
        Ok(remote)
    }

    async fn upload(&self, local: &str, remote_dir: &str) -> Result<String> {
        debug!(file = local, "uploading test input");
        let reference = self.store.upload(Path::new(local), remote_dir).await?;
        Ok(reference.into_inner())
    }

    /// Encode an inline command sequence to a temporary CSV file.
    fn encode_commands(&self, commands: &[Command], job_id: Option<&str>) -> Result<String> {
        let file_name = format!("{}-commands.csv", job_id.unwrap_or("test"));
        let path = std::env::temp_dir().join(file_name);
        Command::save_csv(commands, &path)?;
        Ok(path.display().to_string())
    }
}
