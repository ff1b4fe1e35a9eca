//! Terminal-state detection via a dual-wait race.

use std::time::Duration;

use tracing::{debug, info, warn};

use skytest_core::cluster::{ClusterBackend, TerminalState, WaitCondition};
use skytest_core::error::Result;

/// Blocks until the submitted job reaches a terminal state.
///
/// Two independent waits are started against the same job, one per terminal
/// condition, and raced; the first to resolve is authoritative. Both waits
/// share the configured timeout ceiling, after which an unresolved wait
/// exits non-zero and the race yields `Failed`.
pub struct CompletionWatcher<'a> {
    cluster: &'a dyn ClusterBackend,
    timeout: Duration,
}

impl<'a> CompletionWatcher<'a> {
    pub fn new(cluster: &'a dyn ClusterBackend, timeout: Duration) -> Self {
        Self { cluster, timeout }
    }

    /// Wait for the job's terminal state.
    ///
    /// Returns `Succeeded` iff the success-condition wait resolves first
    /// and exits zero. The losing wait is killed best-effort; its outcome,
    /// and any kill failure, is discarded.
    pub async fn wait(&self, job_id: &str) -> Result<TerminalState> {
        info!(job_id = %job_id, "waiting for cluster job to finish");

        let mut complete = self
            .cluster
            .start_wait(job_id, WaitCondition::Complete, self.timeout)
            .await?;
        let mut failed = self
            .cluster
            .start_wait(job_id, WaitCondition::Failed, self.timeout)
            .await?;

        let state = tokio::select! {
            result = complete.wait() => match result {
                Ok(0) => TerminalState::Succeeded,
                Ok(code) => {
                    warn!(job_id = %job_id, code, "success wait resolved with non-zero status");
                    TerminalState::Failed
                }
                Err(err) => {
                    warn!(job_id = %job_id, error = %err, "success wait aborted");
                    TerminalState::Failed
                }
            },
            _ = failed.wait() => TerminalState::Failed,
        };

        // The race is decided; tear down whatever is still pending.
        let _ = complete.kill().await;
        let _ = failed.kill().await;

        debug!(job_id = %job_id, ?state, "cluster job finished");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytest_core::fakes::{FakeCluster, ScriptedWait};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_clean_success_wins() {
        let cluster = FakeCluster::completing();
        let state = CompletionWatcher::new(&cluster, TIMEOUT)
            .wait("job-1")
            .await
            .expect("wait");

        assert_eq!(state, TerminalState::Succeeded);
        // Loser torn down; the winner's kill is harmless.
        assert!(cluster.failed_wait_killed());
    }

    #[tokio::test]
    async fn test_failure_condition_wins() {
        let cluster = FakeCluster::failing();
        let state = CompletionWatcher::new(&cluster, TIMEOUT)
            .wait("job-1")
            .await
            .expect("wait");

        assert_eq!(state, TerminalState::Failed);
        assert!(cluster.complete_wait_killed());
    }

    #[tokio::test]
    async fn test_success_wait_with_nonzero_status_is_failure() {
        // Near-simultaneous resolution: the success wait wins the race but
        // reports exit code 1, so the outcome is still Failed.
        let cluster = FakeCluster::new(
            ScriptedWait::resolves(1),
            ScriptedWait::resolves_after(0, Duration::from_millis(1)),
        );
        let state = CompletionWatcher::new(&cluster, TIMEOUT)
            .wait("job-1")
            .await
            .expect("wait");

        assert_eq!(state, TerminalState::Failed);
    }

    #[tokio::test]
    async fn test_both_waits_timing_out_is_failure() {
        // An expired wait exits non-zero, whichever is observed first.
        let cluster = FakeCluster::new(
            ScriptedWait::resolves_after(1, Duration::from_millis(2)),
            ScriptedWait::resolves_after(1, Duration::from_millis(2)),
        );
        let state = CompletionWatcher::new(&cluster, TIMEOUT)
            .wait("job-1")
            .await
            .expect("wait");

        assert_eq!(state, TerminalState::Failed);
    }

    #[tokio::test]
    async fn test_kill_failure_is_swallowed() {
        let cluster = FakeCluster::completing().with_failing_kills();
        let state = CompletionWatcher::new(&cluster, TIMEOUT)
            .wait("job-1")
            .await
            .expect("wait");

        assert_eq!(state, TerminalState::Succeeded);
        assert!(cluster.failed_wait_killed());
    }
}
