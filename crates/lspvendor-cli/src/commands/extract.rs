//! Extraction command.

use anyhow::{Context, Result};
use lspvendor_core::TargetRegistry;
use lspvendor_executor::LocalExecutor;
use lspvendor_pipeline::{Pipeline, PipelineResult, RunProfile, StageState};
use std::path::PathBuf;
use std::sync::Arc;

/// Extract one target with local processes.
pub async fn run(
    registry: TargetRegistry,
    lsp: Option<String>,
    workdir: PathBuf,
    profile: RunProfile,
) -> Result<()> {
    let name = super::select(&registry, lsp.as_deref())?.name.clone();

    println!("Extracting: {}", name);
    println!("Working directory: {}", workdir.display());

    let pipeline = Pipeline::new(registry, Arc::new(LocalExecutor::new()), profile);
    let result = pipeline.extract(&name, &workdir).await;

    print_summary(&result);

    let result = result
        .into_result()
        .with_context(|| format!("Extraction of '{}' failed", name))?;

    if let Some(output) = &result.output_dir {
        println!("\n✓ {} artifact(s) copied to {}", result.artifacts.len(), output.display());
    }
    Ok(())
}

fn print_summary(result: &PipelineResult) {
    println!("\n--- Stage Summary ({}) ---", result.run_id);
    for record in &result.stages {
        let status = match &record.state {
            StageState::Succeeded => match (record.started_at, record.finished_at) {
                (Some(start), Some(end)) => {
                    format!("✓ succeeded in {}ms", (end - start).num_milliseconds())
                }
                _ => "✓ succeeded".to_string(),
            },
            StageState::Failed { message } => format!("✗ failed: {}", message),
            StageState::Skipped { reason } => format!("⊘ skipped: {}", reason),
            StageState::Pending => "○ pending".to_string(),
            StageState::Running => "▶ running".to_string(),
        };
        println!("  {} - {}", record.stage, status);
    }
}
