//! Tool availability check.

use anyhow::{Result, bail};
use lspvendor_core::executor::{CommandSpec, Executor};
use lspvendor_core::{TargetConfig, TargetRegistry};
use std::sync::Arc;

/// Programs every extraction needs regardless of target.
const PIPELINE_TOOLS: &[&str] = &["git", "cp"];

pub async fn run(
    registry: &TargetRegistry,
    lsp: Option<String>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let target = super::select(registry, lsp.as_deref())?;
    let missing = missing_tools(target, executor.as_ref()).await;

    if !missing.is_empty() {
        bail!("tools required by '{}' are missing: {}", target.name, missing.join(", "));
    }
    Ok(())
}

/// Every distinct program the target needs, pipeline tools first.
fn required_programs(target: &TargetConfig) -> Vec<&str> {
    let mut programs: Vec<&str> = PIPELINE_TOOLS.to_vec();
    for step in target
        .repo_build_steps
        .iter()
        .chain(&target.server_build_steps)
    {
        if !programs.contains(&step.program.as_str()) {
            programs.push(&step.program);
        }
    }
    programs
}

async fn missing_tools(target: &TargetConfig, executor: &dyn Executor) -> Vec<String> {
    let mut missing = Vec::new();
    for program in required_programs(target) {
        if executor.can_execute(&CommandSpec::new(program)).await {
            eprintln!("[OK] {}", program);
        } else {
            eprintln!("[FAIL] {} not found in PATH", program);
            missing.push(program.to_string());
        }
    }
    missing
}
