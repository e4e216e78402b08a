//! Local process executor implementation.

use async_trait::async_trait;
use lspvendor_core::executor::{CommandOutcome, CommandSpec, Executor};
use lspvendor_core::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands as child processes of the current one.
///
/// Children inherit stdout and stderr so build progress shows up live;
/// stdin is closed. There is no timeout and no cancellation.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the program the way the child would see it.
    pub fn resolve(spec: &CommandSpec) -> Option<PathBuf> {
        let cwd = match &spec.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().ok()?,
        };
        which::which_in(&spec.program, std::env::var_os("PATH"), cwd).ok()
    }
}

#[async_trait]
impl Executor for LocalExecutor {
    async fn can_execute(&self, spec: &CommandSpec) -> bool {
        Self::resolve(spec).is_some()
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        debug!(command = %spec, dir = ?spec.working_dir, "Starting process");
        let status = command.status().await.map_err(|e| {
            warn!(command = %spec, error = %e, "Process could not be started");
            Error::ExecutionFailed(format!("failed to start `{}`: {}", spec, e))
        })?;

        let outcome = CommandOutcome {
            exit_code: status.code(),
        };
        debug!(command = %spec, status = %outcome.describe(), "Process finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let outcome = LocalExecutor::new()
            .run(&CommandSpec::new("true"))
            .await
            .unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_failing_command_reports_exit_code() {
        let outcome = LocalExecutor::new()
            .run(&CommandSpec::new("sh").args(["-c", "exit 42"]))
            .await
            .unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, Some(42));
    }

    #[tokio::test]
    async fn test_missing_program_is_execution_failure() {
        let result = LocalExecutor::new()
            .run(&CommandSpec::new("lspvendor-definitely-not-a-program"))
            .await;
        assert!(matches!(result, Err(Error::ExecutionFailed(_))));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = LocalExecutor::new()
            .run(&CommandSpec::new("touch").arg("marker").current_dir(dir.path()))
            .await
            .unwrap();
        assert!(outcome.success());
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_can_execute_resolves_path() {
        let executor = LocalExecutor::new();
        assert!(executor.can_execute(&CommandSpec::new("sh")).await);
        assert!(
            !executor
                .can_execute(&CommandSpec::new("lspvendor-definitely-not-a-program"))
                .await
        );
    }
}
