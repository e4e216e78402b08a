//! Executor trait and command types.
//!
//! Every external process the pipeline starts (git, build tools, cp) goes
//! through an [`Executor`], so tests can substitute a recording double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

/// Specification for one external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute, resolved through `PATH`.
    pub program: String,
    /// Arguments passed verbatim, no shell interpretation.
    pub args: Vec<String>,
    /// Working directory; inherits the caller's when unset.
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of a command that was started and ran to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human readable description of how the command ended.
    pub fn describe(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Trait for command executors.
///
/// `run` only returns `Err` when the command could not be started at all;
/// a non-zero exit is reported through [`CommandOutcome`].
#[async_trait]
pub trait Executor: Send + Sync {
    /// Check whether the program named by the spec can be started.
    async fn can_execute(&self, spec: &CommandSpec) -> bool;

    /// Run the command to completion, forwarding its output.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome>;
}
