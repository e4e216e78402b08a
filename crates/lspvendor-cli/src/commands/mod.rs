//! CLI command implementations.

pub mod check;
pub mod extract;

use anyhow::{Result, bail};
use lspvendor_core::{TargetConfig, TargetRegistry};

/// Print every registered target, one per line.
pub fn print_targets(registry: &TargetRegistry) {
    println!("Available LSPs:");
    for target in registry.iter() {
        println!("- {}", describe(target));
    }
}

fn describe(target: &TargetConfig) -> String {
    match &target.repo_revision {
        Some(rev) => format!("{} ({} @ {})", target.name, target.repo_location, rev),
        None => format!("{} ({})", target.name, target.repo_location),
    }
}

pub fn list(registry: &TargetRegistry, json: bool) -> Result<()> {
    if json {
        let targets: Vec<&TargetConfig> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        print_targets(registry);
    }
    Ok(())
}

/// Resolve the `--lsp` argument, printing the registry when it is unusable.
pub fn select<'a>(registry: &'a TargetRegistry, lsp: Option<&str>) -> Result<&'a TargetConfig> {
    let Some(name) = lsp else {
        print_targets(registry);
        bail!("--lsp flag is required");
    };
    match registry.lookup(name) {
        Ok(target) => Ok(target),
        Err(e) => {
            print_targets(registry);
            bail!(e);
        }
    }
}
