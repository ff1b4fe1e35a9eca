//! Test specification aggregate.
//!
//! Mirrors the on-disk YAML format: every section except `agent` is
//! optional, and file-valued fields hold either a local path or a remote
//! reference produced by an upload.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::command::Command;

/// A complete simulation test specification.
///
/// Read-only input to the orchestrator; a transformed copy is derived once
/// for remote execution and never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Vehicle configuration (mission and parameter files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone: Option<DroneConfig>,

    /// Simulator configuration. Drives job-template selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationConfig>,

    /// Test steps: an inline command sequence or an encoded file reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<TestConfig>,

    /// Assertion inputs, including the baseline log excluded from results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<AssertionConfig>,

    /// Execution target.
    pub agent: AgentConfig,
}

impl TestSpec {
    /// Whether the spec requests the obstacle-avoidance simulator stack.
    pub fn wants_avoidance(&self) -> bool {
        self.simulation
            .as_ref()
            .map(|s| s.simulator == Simulator::Ros)
            .unwrap_or(false)
    }
}

/// Vehicle inputs executed by each worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DroneConfig {
    /// Mission plan file (local path or remote reference).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_file: Option<String>,

    /// Autopilot parameter file (local path or remote reference).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_file: Option<String>,
}

/// Simulator variant to run inside each worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Simulator {
    /// Gazebo SITL.
    Gazebo,

    /// jMAVSim SITL.
    Jmavsim,

    /// ROS stack with obstacle avoidance.
    Ros,
}

impl Simulator {
    pub fn name(&self) -> &'static str {
        match self {
            Simulator::Gazebo => "gazebo",
            Simulator::Jmavsim => "jmavsim",
            Simulator::Ros => "ros",
        }
    }
}

/// Simulation environment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub simulator: Simulator,

    /// World/environment name understood by the simulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<String>,

    /// Run the simulator without a GUI.
    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_headless() -> bool {
    true
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulator: Simulator::Gazebo,
            world: None,
            headless: true,
        }
    }
}

/// Test steps fed to the vehicle during the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Inline command sequence. Encoded to a CSV file before upload when no
    /// `commands_file` reference exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<Command>>,

    /// Reference to an already-encoded command file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_file: Option<String>,
}

/// Assertion inputs for post-run checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssertionConfig {
    /// Baseline log the live run is compared against. Never counted as a
    /// produced result, even when its extension matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

/// Where and how the test executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentEngine {
    /// Run in the invoking process's environment.
    Local,

    /// Run in a local container.
    Docker,

    /// Submit as a cluster job.
    K8s,
}

/// Execution target for the test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub engine: AgentEngine,

    /// Requested worker replica count.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Job identifier. Back-filled with a timestamp when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Remote output directory shared between submitter and workers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_count() -> u32 {
    1
}

impl AgentConfig {
    /// Whether a usable (non-empty) job identifier is present.
    pub fn has_id(&self) -> bool {
        self.id.as_deref().map(|id| !id.is_empty()).unwrap_or(false)
    }
}

/// Generate a time-derived identifier, usable as a job name.
pub fn time_id() -> String {
    Utc::now().format("%Y-%m-%d-%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k8s_agent() -> AgentConfig {
        AgentConfig {
            engine: AgentEngine::K8s,
            count: 3,
            id: None,
            path: Some("/srv/skytest/jobs/test-1".to_string()),
        }
    }

    #[test]
    fn test_has_id_rejects_empty_and_missing() {
        let mut agent = k8s_agent();
        assert!(!agent.has_id());
        agent.id = Some(String::new());
        assert!(!agent.has_id());
        agent.id = Some("job-1".to_string());
        assert!(agent.has_id());
    }

    #[test]
    fn test_time_id_is_nonempty_and_name_safe() {
        let id = time_id();
        assert!(!id.is_empty());
        // Kubernetes object names: lowercase alphanumerics and dashes.
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_wants_avoidance() {
        let mut spec = TestSpec {
            drone: None,
            simulation: None,
            test: None,
            assertion: None,
            agent: k8s_agent(),
        };
        assert!(!spec.wants_avoidance());

        spec.simulation = Some(SimulationConfig {
            simulator: Simulator::Gazebo,
            ..Default::default()
        });
        assert!(!spec.wants_avoidance());

        spec.simulation = Some(SimulationConfig {
            simulator: Simulator::Ros,
            ..Default::default()
        });
        assert!(spec.wants_avoidance());
    }

    #[test]
    fn test_spec_yaml_roundtrip_via_json() {
        let spec = TestSpec {
            drone: Some(DroneConfig {
                mission_file: Some("mission.plan".to_string()),
                params_file: None,
            }),
            simulation: Some(SimulationConfig::default()),
            test: None,
            assertion: Some(AssertionConfig {
                log_file: Some("baseline.ulg".to_string()),
            }),
            agent: k8s_agent(),
        };

        let json = serde_json::to_string(&spec).unwrap();
        let back: TestSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
