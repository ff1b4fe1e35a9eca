//! skytest cluster - run simulation tests as Kubernetes jobs
//!
//! Provides the job lifecycle orchestrator:
//! - Rewrites a local test specification into a remote-executable copy
//! - Patches and applies a job manifest (N identical worker replicas)
//! - Races the success and failure terminal conditions, killing the loser
//! - Downloads and filters the produced simulation logs

pub mod agent;
pub mod collect;
pub mod kubectl;
pub mod settings;
pub mod shared_dir;
pub mod submit;
pub mod transform;
pub mod watch;

// Re-export key types
pub use agent::K8sAgent;
pub use collect::ResultCollector;
pub use kubectl::KubectlCluster;
pub use settings::ClusterSettings;
pub use shared_dir::SharedDirStore;
pub use submit::JobSubmitter;
pub use transform::ConfigTransformer;
pub use watch::CompletionWatcher;
