//! Source fetching: clone or update the target repository.

use lspvendor_core::executor::{CommandSpec, Executor};
use lspvendor_core::{Error, Result, TargetConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::profile::OnExisting;
use crate::workspace::WorkspaceState;

/// What the fetcher did to make the repository ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    Cloned,
    Updated,
}

/// Makes sure the target's repository is present in the workspace.
pub struct SourceFetcher {
    executor: Arc<dyn Executor>,
    on_existing: OnExisting,
}

impl SourceFetcher {
    pub fn new(executor: Arc<dyn Executor>, on_existing: OnExisting) -> Self {
        Self {
            executor,
            on_existing,
        }
    }

    /// Clone into an empty workspace, otherwise fail or pull per `OnExisting`.
    pub async fn ensure(&self, state: &WorkspaceState, target: &TargetConfig) -> Result<FetchAction> {
        if !state.repo_exists().await? {
            info!(repo = %target.repo_location, revision = ?target.repo_revision, "Cloning repository");
            self.git(clone_command(target, &state.repo_dir)).await?;
            return Ok(FetchAction::Cloned);
        }

        match self.on_existing {
            OnExisting::Error => {
                error!(dir = %state.repo_dir.display(), "Repository directory already exists");
                Err(Error::Fetch(format!(
                    "repository directory {} already exists; remove it or run in update mode",
                    state.repo_dir.display()
                )))
            }
            OnExisting::Update => {
                info!(dir = %state.repo_dir.display(), "Updating existing repository");
                self.git(update_command(&state.repo_dir)).await?;
                Ok(FetchAction::Updated)
            }
        }
    }

    async fn git(&self, spec: CommandSpec) -> Result<()> {
        let outcome = self.executor.run(&spec).await.map_err(|e| {
            error!(command = %spec, error = %e, "Git could not be started");
            Error::Fetch(format!("`{}`: {}", spec, e))
        })?;
        if !outcome.success() {
            error!(command = %spec, status = %outcome.describe(), "Git command failed");
            return Err(Error::Fetch(format!("`{}` {}", spec, outcome.describe())));
        }
        Ok(())
    }
}

/// `git clone [--depth 1 --branch <rev>] -- <location> <dir>`
///
/// The `--` keeps a location starting with `-` from being read as an option.
pub fn clone_command(target: &TargetConfig, repo_dir: &Path) -> CommandSpec {
    let mut spec = CommandSpec::new("git").arg("clone");
    if let Some(rev) = &target.repo_revision {
        spec = spec.args(["--depth", "1", "--branch", rev.as_str()]);
    }
    spec.arg("--")
        .arg(target.repo_location.as_str())
        .arg(repo_dir.to_string_lossy())
}

/// `git -C <dir> pull`
pub fn update_command(repo_dir: &Path) -> CommandSpec {
    CommandSpec::new("git")
        .arg("-C")
        .arg(repo_dir.to_string_lossy())
        .arg("pull")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RunProfile;
    use crate::testing::{RecordingExecutor, target};

    async fn workspace(base: &Path) -> WorkspaceState {
        WorkspaceState::prepare(base, "eslint", &RunProfile::cache())
            .await
            .unwrap()
    }

    #[test]
    fn test_clone_command_without_revision() {
        let spec = clone_command(&target("eslint"), Path::new("/w/eslint/repo"));
        assert_eq!(
            spec.to_string(),
            "git clone -- https://example.com/eslint.git /w/eslint/repo"
        );
    }

    #[test]
    fn test_clone_command_pins_revision() {
        let mut pinned = target("eslint");
        pinned.repo_revision = Some("release/3.0.8".to_string());
        let spec = clone_command(&pinned, Path::new("/w/eslint/repo"));
        assert_eq!(
            spec.args,
            vec![
                "clone",
                "--depth",
                "1",
                "--branch",
                "release/3.0.8",
                "--",
                "https://example.com/eslint.git",
                "/w/eslint/repo",
            ]
        );
    }

    #[test]
    fn test_clone_command_never_treats_location_as_option() {
        let mut hostile = target("eslint");
        hostile.repo_location = "--upload-pack=touch /tmp/pwned".to_string();
        let spec = clone_command(&hostile, Path::new("/w/eslint/repo"));
        assert_eq!(
            spec.args,
            vec!["clone", "--", "--upload-pack=touch /tmp/pwned", "/w/eslint/repo"]
        );
    }

    #[test]
    fn test_update_command() {
        let spec = update_command(Path::new("/w/eslint/repo"));
        assert_eq!(spec.to_string(), "git -C /w/eslint/repo pull");
    }

    #[tokio::test]
    async fn test_clone_into_empty_workspace() {
        let base = tempfile::tempdir().unwrap();
        let state = workspace(base.path()).await;
        let executor = Arc::new(RecordingExecutor::new());
        let fetcher = SourceFetcher::new(executor.clone(), OnExisting::Error);

        let action = fetcher.ensure(&state, &target("eslint")).await.unwrap();

        assert_eq!(action, FetchAction::Cloned);
        assert_eq!(executor.commands().len(), 1);
        assert!(executor.commands()[0].starts_with("git clone"));
        assert!(state.repo_dir.join("README.md").exists());
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_existing_repo_without_running_git() {
        let base = tempfile::tempdir().unwrap();
        let state = workspace(base.path()).await;
        std::fs::create_dir_all(&state.repo_dir).unwrap();
        let executor = Arc::new(RecordingExecutor::new());
        let fetcher = SourceFetcher::new(executor.clone(), OnExisting::Error);

        let result = fetcher.ensure(&state, &target("eslint")).await;

        match result {
            Err(Error::Fetch(message)) => {
                assert!(message.contains(&state.repo_dir.display().to_string()))
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    async fn test_reuse_mode_clones_then_updates() {
        let base = tempfile::tempdir().unwrap();
        let state = workspace(base.path()).await;
        let executor = Arc::new(RecordingExecutor::new());
        let fetcher = SourceFetcher::new(executor.clone(), OnExisting::Update);
        let target = target("eslint");

        assert_eq!(
            fetcher.ensure(&state, &target).await.unwrap(),
            FetchAction::Cloned
        );
        assert!(std::fs::read_dir(&state.repo_dir).unwrap().next().is_some());

        assert_eq!(
            fetcher.ensure(&state, &target).await.unwrap(),
            FetchAction::Updated
        );
        assert!(std::fs::read_dir(&state.repo_dir).unwrap().next().is_some());

        let commands = executor.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].starts_with("git clone"));
        assert!(commands[1].ends_with("pull"));
    }

    #[tokio::test]
    async fn test_failed_clone_is_fetch_error_with_command() {
        let base = tempfile::tempdir().unwrap();
        let state = workspace(base.path()).await;
        let executor = Arc::new(RecordingExecutor::new().failing("git"));
        let fetcher = SourceFetcher::new(executor, OnExisting::Update);

        match fetcher.ensure(&state, &target("eslint")).await {
            Err(Error::Fetch(message)) => {
                assert!(message.contains("git clone"));
                assert!(message.contains("exited with status 1"));
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }

    /// Needs network access.
    /// Run with: cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_real_pinned_clone() {
        let base = tempfile::tempdir().unwrap();
        let state = workspace(base.path()).await;
        let executor = Arc::new(lspvendor_executor::LocalExecutor::new());
        let fetcher = SourceFetcher::new(executor, OnExisting::Error);
        let mut eslint = target("eslint");
        eslint.repo_location = "https://github.com/microsoft/vscode-eslint.git".to_string();
        eslint.repo_revision = Some("release/3.0.8".to_string());

        fetcher.ensure(&state, &eslint).await.unwrap();
        assert!(state.repo_dir.join("server").is_dir());
    }
}
