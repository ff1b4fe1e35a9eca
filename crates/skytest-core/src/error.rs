//! Domain-level error taxonomy for skytest.

use std::path::PathBuf;

/// skytest domain errors.
///
/// No stage retries internally; the first failure aborts the rest of the
/// pipeline and surfaces one of these to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("invalid test spec: {0}")]
    InvalidSpec(String),

    #[error("job submission failed with exit code {code}")]
    Submission {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("upload of {path} failed: {reason}")]
    Upload { path: String, reason: String },

    #[error("download of {remote} failed: {reason}")]
    Download { remote: String, reason: String },

    #[error("job {job_id} produced no simulation logs")]
    EmptyResult { job_id: String },

    #[error("download destination {} already exists", path.display())]
    DestinationCollision { path: PathBuf },

    #[error("cluster wait could not be started: {0}")]
    Wait(String),

    #[error("command encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for skytest domain operations.
pub type Result<T> = std::result::Result<T, TestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error_display() {
        let err = TestError::Submission {
            code: 1,
            stdout: String::new(),
            stderr: "error: no objects passed to apply".to_string(),
        };
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_empty_result_error_names_job() {
        let err = TestError::EmptyResult {
            job_id: "2024-03-01-10-30-00".to_string(),
        };
        assert!(err.to_string().contains("2024-03-01-10-30-00"));
    }

    #[test]
    fn test_destination_collision_names_path() {
        let err = TestError::DestinationCollision {
            path: PathBuf::from("tmp/job-1"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tmp/job-1"));
        assert!(msg.contains("already exists"));
    }
}
