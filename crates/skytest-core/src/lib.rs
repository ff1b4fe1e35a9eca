//! skytest core - domain model for cluster-run simulation tests
//!
//! Defines the test specification aggregate, the command-sequence encoder,
//! the result model, and the contracts the orchestrator consumes:
//! - `FileStore`: upload/download against the job's shared output location
//! - `ClusterBackend`: manifest apply and terminal-condition waits
//! - shell execution helpers built on `tokio::process`
//!
//! In-memory fakes for the contracts live in the `fakes` module.

pub mod cluster;
pub mod command;
pub mod error;
pub mod exec;
pub mod fakes;
pub mod result;
pub mod spec;
pub mod telemetry;
pub mod transfer;

// Re-export key types
pub use cluster::{ClusterBackend, JobRequest, TerminalState, WaitCondition, WaitHandle};
pub use command::Command;
pub use error::{Result, TestError};
pub use exec::ExecOutput;
pub use result::TestResult;
pub use telemetry::init_tracing;
pub use spec::{
    AgentConfig, AgentEngine, AssertionConfig, DroneConfig, SimulationConfig, Simulator,
    TestConfig, TestSpec,
};
pub use transfer::{FileStore, RemoteFileRef};
