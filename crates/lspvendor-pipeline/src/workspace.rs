//! Per-target working directories.

use lspvendor_core::{Error, Result, TargetConfig};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::profile::{OutputLocation, RunProfile};

/// Directories used by one run. Derived from disk on every run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    pub base_dir: PathBuf,
    /// `<base>/<target>`
    pub target_dir: PathBuf,
    /// `<base>/<target>/repo`; its presence decides clone vs. update.
    pub repo_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl WorkspaceState {
    /// Absolute directories for a target, without touching disk.
    fn resolve(base_dir: &Path, target_name: &str, output: &OutputLocation) -> Result<Self> {
        let base_dir = std::path::absolute(base_dir).map_err(|e| Error::workspace(base_dir, e))?;
        let target_dir = base_dir.join(target_name);
        let output_dir = output.resolve(&target_dir)?;
        let repo_dir = target_dir.join("repo");

        Ok(Self {
            base_dir,
            target_dir,
            repo_dir,
            output_dir,
        })
    }

    /// Create `<base>/<target>` if missing. Calling this again is harmless.
    ///
    /// The profile is checked against the resolved paths first, so a rejected
    /// profile leaves nothing behind.
    pub async fn prepare(base_dir: &Path, target_name: &str, profile: &RunProfile) -> Result<Self> {
        let state = Self::resolve(base_dir, target_name, &profile.output)?;
        profile.check(&state.target_dir, &state.output_dir)?;

        tokio::fs::create_dir_all(&state.target_dir)
            .await
            .map_err(|e| Error::workspace(&state.target_dir, e))?;
        info!(dir = %state.target_dir.display(), "Workspace ready");
        Ok(state)
    }

    /// `<repo>/<server_subpath>`
    pub fn server_dir(&self, target: &TargetConfig) -> PathBuf {
        self.repo_dir.join(&target.server_subpath)
    }

    /// `<repo>/<server_subpath>/<output_subpath>`
    pub fn artifact_dir(&self, target: &TargetConfig) -> PathBuf {
        self.server_dir(target).join(&target.output_subpath)
    }

    pub async fn repo_exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.repo_dir)
            .await
            .map_err(|e| Error::workspace(&self.repo_dir, e))
    }

    pub async fn create_output_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| Error::workspace(&self.output_dir, e))
    }

    /// Recursively remove `<base>/<target>`. A missing directory is fine.
    pub async fn teardown(&self) -> Result<()> {
        info!(dir = %self.target_dir.display(), "Cleaning up workspace");
        match tokio::fs::remove_dir_all(&self.target_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::workspace(&self.target_dir, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::target;

    #[tokio::test]
    async fn test_prepare_creates_target_dir() {
        let base = tempfile::tempdir().unwrap();
        let state = WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache())
            .await
            .unwrap();

        assert!(state.target_dir.is_dir());
        assert_eq!(state.target_dir, base.path().join("eslint"));
        assert_eq!(state.repo_dir, base.path().join("eslint/repo"));
        assert_eq!(state.output_dir, base.path().join("eslint/output"));
        assert!(!state.repo_exists().await.unwrap());
        assert!(!state.output_dir.exists());
    }

    #[tokio::test]
    async fn test_rejected_profile_creates_nothing() {
        let base = tempfile::tempdir().unwrap();
        let profile = RunProfile::ephemeral().with_output(OutputLocation::Workspace);

        let result = WorkspaceState::prepare(base.path(), "eslint", &profile).await;

        assert!(matches!(result, Err(Error::Configuration(_))));
        assert!(!base.path().join("eslint").exists());
    }

    #[tokio::test]
    async fn test_prepare_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let first = WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache())
            .await
            .unwrap();
        std::fs::write(first.target_dir.join("keep"), "x").unwrap();

        let second = WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(second.target_dir.join("keep").exists());
    }

    #[tokio::test]
    async fn test_prepare_fails_when_base_is_a_file() {
        let base = tempfile::NamedTempFile::new().unwrap();
        let result =
            WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache()).await;
        assert!(matches!(result, Err(Error::Workspace { .. })));
    }

    #[tokio::test]
    async fn test_paths_follow_target_layout() {
        let base = tempfile::tempdir().unwrap();
        let state = WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache())
            .await
            .unwrap();
        let target = target("eslint");

        assert_eq!(state.server_dir(&target), state.repo_dir.join("server"));
        assert_eq!(state.artifact_dir(&target), state.repo_dir.join("server/out"));
    }

    #[tokio::test]
    async fn test_teardown_removes_target_dir_only() {
        let base = tempfile::tempdir().unwrap();
        let state = WorkspaceState::prepare(base.path(), "eslint", &RunProfile::cache())
            .await
            .unwrap();
        tokio::fs::create_dir_all(state.repo_dir.join("server"))
            .await
            .unwrap();

        state.teardown().await.unwrap();
        assert!(!state.target_dir.exists());
        assert!(base.path().exists());

        // Already gone.
        state.teardown().await.unwrap();
    }
}
