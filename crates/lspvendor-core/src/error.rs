//! Error types for lspvendor.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown target: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("workspace error at {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("build step `{step}` failed in {}: {message}", dir.display())]
    Build {
        step: String,
        dir: PathBuf,
        message: String,
    },

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl Error {
    /// Wrap an I/O failure on a workspace path.
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Workspace {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
