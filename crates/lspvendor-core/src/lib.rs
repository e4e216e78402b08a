//! Core domain types and traits for lspvendor.
//!
//! This crate contains:
//! - Run identifiers
//! - Target configuration and build steps
//! - The immutable target registry
//! - The executor trait used for every external command
//! - The error taxonomy shared by the pipeline

pub mod error;
pub mod executor;
pub mod id;
pub mod registry;
pub mod target;

pub use error::{Error, Result};
pub use id::RunId;
pub use registry::TargetRegistry;
pub use target::{BuildStep, TargetConfig};
