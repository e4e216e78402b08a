//! Run profiles: how a run treats leftovers and where artifacts go.

use derive_more::Display;
use lspvendor_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the fetcher does when the repository directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum OnExisting {
    /// Single-use workspace: a leftover clone means an earlier run failed.
    #[display("error")]
    Error,
    /// Long-lived workspace: pull the latest changes in place.
    #[display("update")]
    Update,
}

/// Where collected artifacts are copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputLocation {
    /// `<base>/<target>/output`
    Workspace,
    /// A fixed directory; relative paths resolve against the process cwd.
    Directory(PathBuf),
}

impl OutputLocation {
    /// Absolute output directory for a target directory.
    pub fn resolve(&self, target_dir: &Path) -> Result<PathBuf> {
        match self {
            OutputLocation::Workspace => Ok(target_dir.join("output")),
            OutputLocation::Directory(dir) => {
                std::path::absolute(dir).map_err(|e| Error::workspace(dir, e))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProfile {
    pub on_existing: OnExisting,
    pub output: OutputLocation,
    /// Remove `<base>/<target>` once the run ends, unless it holds a clone
    /// from an earlier run that `OnExisting::Error` refused.
    pub teardown: bool,
}

impl RunProfile {
    /// Re-runnable extraction cache: update in place, keep everything.
    pub fn cache() -> Self {
        Self {
            on_existing: OnExisting::Update,
            output: OutputLocation::Workspace,
            teardown: false,
        }
    }

    /// Clean single-use run that leaves only `./out` behind.
    pub fn ephemeral() -> Self {
        Self {
            on_existing: OnExisting::Error,
            output: OutputLocation::Directory(PathBuf::from("out")),
            teardown: true,
        }
    }

    pub fn with_output(mut self, output: OutputLocation) -> Self {
        self.output = output;
        self
    }

    /// Reject combinations where teardown would delete the collected artifacts.
    pub fn check(&self, target_dir: &Path, output_dir: &Path) -> Result<()> {
        if self.teardown && output_dir.starts_with(target_dir) {
            return Err(Error::Configuration(format!(
                "output directory {} lies inside the workspace {} which is removed after the run",
                output_dir.display(),
                target_dir.display()
            )));
        }
        Ok(())
    }
}

impl Default for RunProfile {
    fn default() -> Self {
        Self::cache()
    }
}
