//! Artifact discovery and copy.

use lspvendor_core::executor::{CommandSpec, Executor};
use lspvendor_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Copies everything directly inside a build output directory.
pub struct ArtifactCollector {
    executor: Arc<dyn Executor>,
}

impl ArtifactCollector {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Copy each entry of `source` into `dest` with `cp -r`.
    ///
    /// Fails without copying anything when `source` is missing or empty.
    /// A failed copy aborts; entries already copied stay in `dest`.
    /// Returns the copied entry names.
    pub async fn collect(&self, source: &Path, dest: &Path) -> Result<Vec<String>> {
        let entries = list_entries(source).await?;
        if entries.is_empty() {
            error!(dir = %source.display(), "Build produced no artifacts");
            return Err(Error::Artifact(format!(
                "no files found in {} to copy",
                source.display()
            )));
        }

        info!(from = %source.display(), to = %dest.display(), count = entries.len(), "Copying artifacts");
        let mut copied = Vec::with_capacity(entries.len());
        for entry in entries {
            let spec = CommandSpec::new("cp")
                .arg("-r")
                .arg(entry.to_string_lossy())
                .arg(dest.to_string_lossy())
                .current_dir(dest);

            let outcome = self
                .executor
                .run(&spec)
                .await
                .map_err(|e| Error::Artifact(format!("`{}`: {}", spec, e)))?;
            if !outcome.success() {
                error!(command = %spec, status = %outcome.describe(), "Copy failed");
                return Err(Error::Artifact(format!("`{}` {}", spec, outcome.describe())));
            }

            if let Some(name) = entry.file_name() {
                copied.push(name.to_string_lossy().into_owned());
            }
        }
        Ok(copied)
    }
}

/// Entries directly inside `dir`, sorted by path. Dotfiles included.
async fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| {
        Error::Artifact(format!("cannot read output directory {}: {}", dir.display(), e))
    })?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| Error::Artifact(format!("cannot read output directory {}: {}", dir.display(), e)))?
    {
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}
