//! Sequential build step execution.

use lspvendor_core::executor::Executor;
use lspvendor_core::{BuildStep, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Runs build steps one after another, stopping at the first failure.
pub struct BuildRunner {
    executor: Arc<dyn Executor>,
}

impl BuildRunner {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Run every step in `dir`. Returns how many steps ran.
    pub async fn run(&self, steps: &[BuildStep], dir: &Path) -> Result<usize> {
        for (index, step) in steps.iter().enumerate() {
            info!(step = %step, dir = %dir.display(), "Running build step {}/{}", index + 1, steps.len());

            let spec = step.command(dir);
            let outcome = self.executor.run(&spec).await.map_err(|e| {
                error!(step = %step, dir = %dir.display(), error = %e, "Build step could not be started");
                Error::Build {
                    step: step.to_string(),
                    dir: dir.to_path_buf(),
                    message: e.to_string(),
                }
            })?;

            if !outcome.success() {
                error!(step = %step, dir = %dir.display(), status = %outcome.describe(), "Build step failed");
                return Err(Error::Build {
                    step: step.to_string(),
                    dir: dir.to_path_buf(),
                    message: outcome.describe(),
                });
            }
        }
        Ok(steps.len())
    }
}
