//! Target registry configuration for lspvendor.
//!
//! This crate handles:
//! - The built-in target table
//! - Parsing target definitions from KDL files

pub mod builtin;
pub mod error;
pub mod targets;

pub use builtin::builtin_registry;
pub use error::{ConfigError, ConfigResult};
pub use targets::{load_targets_file, parse_targets};

use lspvendor_core::TargetRegistry;
use std::path::Path;

/// Load the registry from `path`, or fall back to the built-in table.
///
/// A config file replaces the built-in targets rather than extending them.
pub fn load_registry(path: Option<&Path>) -> ConfigResult<TargetRegistry> {
    match path {
        Some(path) => {
            let targets = load_targets_file(path)?;
            Ok(TargetRegistry::new(targets)?)
        }
        None => builtin_registry(),
    }
}
