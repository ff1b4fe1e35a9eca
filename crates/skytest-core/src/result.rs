//! Collected test results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension of simulation logs recognized as results.
pub const LOG_EXTENSION: &str = "ulg";

/// One downloaded artifact recognized as a simulation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    log_file: PathBuf,
}

impl TestResult {
    pub fn new(log_file: PathBuf) -> Self {
        Self { log_file }
    }

    /// Local path of the downloaded simulation log.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Whether a downloaded entry qualifies as a produced result.
///
/// A file qualifies iff it carries the simulation-log extension and its
/// file name differs from the configured baseline log's file name. The
/// baseline was uploaded alongside the inputs, so it comes back with the
/// download and must not be mistaken for worker output.
pub fn is_result_log(entry: &Path, baseline: Option<&str>) -> bool {
    let has_extension = entry
        .extension()
        .map(|ext| ext == LOG_EXTENSION)
        .unwrap_or(false);
    if !has_extension {
        return false;
    }
    match baseline {
        None => true,
        Some(baseline) => {
            let baseline_name = Path::new(baseline).file_name();
            entry.file_name() != baseline_name
        }
    }
}
