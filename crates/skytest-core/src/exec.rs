//! Shell execution helpers.
//!
//! The cluster collaborators are shell tools (`yq`, `kubectl`); these
//! helpers run command strings through `sh -c`, either to completion with
//! captured output or as a killable child for the watch race.

use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::Result;

/// Captured outcome of a completed shell command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code (0 = success, -1 when terminated by signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the command exited cleanly.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a shell command to completion, capturing stdout and stderr.
pub async fn run_shell(command: &str) -> Result<ExecOutput> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Spawn a shell command and return the child for waiting or killing.
///
/// Output streams are discarded; callers only observe the exit status.
pub fn spawn_shell(command: &str) -> Result<Child> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_shell_captures_stdout() {
        let output = run_shell("echo hello").await.expect("run failed");
        assert!(output.success());
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_run_shell_nonzero_exit() {
        let output = run_shell("exit 3").await.expect("run failed");
        assert!(!output.success());
        assert_eq!(output.exit_code, 3);
    }

    #[tokio::test]
    async fn test_spawn_shell_can_be_killed() {
        let mut child = spawn_shell("sleep 30").expect("spawn failed");
        child.kill().await.expect("kill failed");
        let status = child.wait().await.expect("wait failed");
        assert!(!status.success());
    }

    #[tokio::test]
    async fn test_spawn_shell_wait_reports_exit() {
        let mut child = spawn_shell("true").expect("spawn failed");
        let status = child.wait().await.expect("wait failed");
        assert_eq!(status.code(), Some(0));
    }
}
