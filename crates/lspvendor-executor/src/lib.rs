//! Command execution backends for lspvendor.
//!
//! Provides the executor used for real runs:
//! - Local processes with inherited stdout/stderr

pub mod process;

pub use lspvendor_core::executor::{CommandOutcome, CommandSpec, Executor};
pub use process::LocalExecutor;
