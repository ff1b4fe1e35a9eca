//! Environment-derived orchestrator settings.

use std::path::PathBuf;
use std::time::Duration;

/// Local staging directory for downloaded job output.
pub const DOWNLOAD_DIR_VAR: &str = "SKYTEST_DOWNLOAD_DIR";

/// Default job manifest template.
pub const JOB_TEMPLATE_VAR: &str = "SKYTEST_JOB_TEMPLATE";

/// Manifest template for the obstacle-avoidance simulator variant.
pub const AVOIDANCE_JOB_TEMPLATE_VAR: &str = "SKYTEST_AVOIDANCE_JOB_TEMPLATE";

/// Per-watch timeout ceiling in seconds.
pub const WAIT_TIMEOUT_VAR: &str = "SKYTEST_WAIT_TIMEOUT_SECS";

const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 1000;

/// Orchestrator configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    /// Local directory under which per-job download directories are created.
    pub download_dir: PathBuf,

    /// Job manifest template for the default simulator.
    pub job_template: PathBuf,

    /// Job manifest template for the obstacle-avoidance stack.
    pub avoidance_job_template: PathBuf,

    /// Ceiling shared by both terminal-condition waits.
    pub wait_timeout: Duration,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("tmp/"),
            job_template: PathBuf::from("resources/k8s/job.yaml"),
            avoidance_job_template: PathBuf::from("resources/k8s/job-avoidance.yaml"),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }
}

impl ClusterSettings {
    /// Build settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            download_dir: env_path(DOWNLOAD_DIR_VAR).unwrap_or(defaults.download_dir),
            job_template: env_path(JOB_TEMPLATE_VAR).unwrap_or(defaults.job_template),
            avoidance_job_template: env_path(AVOIDANCE_JOB_TEMPLATE_VAR)
                .unwrap_or(defaults.avoidance_job_template),
            wait_timeout: std::env::var(WAIT_TIMEOUT_VAR)
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.wait_timeout),
        }
    }

    /// Template to patch for the given simulator choice.
    pub fn template_for(&self, avoidance: bool) -> &std::path::Path {
        if avoidance {
            &self.avoidance_job_template
        } else {
            &self.job_template
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClusterSettings::default();
        assert_eq!(settings.download_dir, PathBuf::from("tmp/"));
        assert_eq!(settings.job_template, PathBuf::from("resources/k8s/job.yaml"));
        assert_eq!(
            settings.avoidance_job_template,
            PathBuf::from("resources/k8s/job-avoidance.yaml")
        );
        assert_eq!(settings.wait_timeout, Duration::from_secs(1000));
    }

    #[test]
    fn test_template_selection() {
        let settings = ClusterSettings::default();
        assert_eq!(settings.template_for(false), settings.job_template);
        assert_eq!(settings.template_for(true), settings.avoidance_job_template);
    }

    // Env-var reads are process-global, so the from_env coverage keeps to a
    // single test mutating a unique set of variables.
    #[test]
    fn test_from_env_overrides() {
        std::env::set_var(DOWNLOAD_DIR_VAR, "/var/lib/skytest/dl");
        std::env::set_var(WAIT_TIMEOUT_VAR, "120");

        let settings = ClusterSettings::from_env();
        assert_eq!(settings.download_dir, PathBuf::from("/var/lib/skytest/dl"));
        assert_eq!(settings.wait_timeout, Duration::from_secs(120));
        // Untouched variables fall back to defaults.
        assert_eq!(settings.job_template, PathBuf::from("resources/k8s/job.yaml"));

        std::env::remove_var(DOWNLOAD_DIR_VAR);
        std::env::remove_var(WAIT_TIMEOUT_VAR);
    }
}
