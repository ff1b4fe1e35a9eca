//! The job lifecycle orchestrator.

use std::sync::Arc;

use tracing::{info, warn};

use skytest_core::cluster::{ClusterBackend, TerminalState};
use skytest_core::error::Result;
use skytest_core::spec::TestSpec;
use skytest_core::transfer::FileStore;
use skytest_core::TestResult;

use crate::collect::ResultCollector;
use crate::kubectl::KubectlCluster;
use crate::settings::ClusterSettings;
use crate::shared_dir::SharedDirStore;
use crate::submit::JobSubmitter;
use crate::transform::ConfigTransformer;
use crate::watch::CompletionWatcher;

/// Runs one simulation test as a cluster job: transform, submit, wait,
/// collect. One job per invocation, a single pass, no retries.
pub struct K8sAgent {
    settings: ClusterSettings,
    store: Arc<dyn FileStore>,
    cluster: Arc<dyn ClusterBackend>,
}

impl K8sAgent {
    pub fn new(
        settings: ClusterSettings,
        store: Arc<dyn FileStore>,
        cluster: Arc<dyn ClusterBackend>,
    ) -> Self {
        Self {
            settings,
            store,
            cluster,
        }
    }

    /// Agent backed by `kubectl` and a shared mounted volume.
    pub fn kubectl(settings: ClusterSettings) -> Self {
        Self::new(
            settings,
            Arc::new(SharedDirStore::new()),
            Arc::new(KubectlCluster::new()),
        )
    }

    /// Run the test to completion and return the collected results.
    ///
    /// Back-fills a missing agent identifier onto `spec` (the job id must be
    /// observable to the caller for operator diagnosis). Collection runs
    /// whichever terminal state the job reached: a failed job that still
    /// produced logs yields them, and the empty-result invariant decides the
    /// final verdict.
    pub async fn run(&self, spec: &mut TestSpec) -> Result<Vec<TestResult>> {
        let remote_spec = ConfigTransformer::new(self.store.as_ref())
            .transform(spec)
            .await?;

        JobSubmitter::new(self.cluster.as_ref(), &self.settings)
            .submit(spec, &remote_spec)
            .await?;

        // transform guarantees both of these.
        let job_id = spec.agent.id.clone().unwrap_or_default();
        let remote_dir = spec.agent.path.clone().unwrap_or_default();

        let state = CompletionWatcher::new(self.cluster.as_ref(), self.settings.wait_timeout)
            .wait(&job_id)
            .await?;
        match state {
            TerminalState::Succeeded => info!(job_id = %job_id, "cluster job succeeded"),
            TerminalState::Failed => warn!(job_id = %job_id, "cluster job reported failure"),
        }

        let dest = self.settings.download_dir.join(&job_id);
        let baseline = spec
            .assertion
            .as_ref()
            .and_then(|assertion| assertion.log_file.as_deref());

        let results = ResultCollector::new(self.store.as_ref())
            .collect(&job_id, &remote_dir, &dest, baseline)
            .await?;
        info!(job_id = %job_id, count = results.len(), "simulation logs collected");
        Ok(results)
    }
}
