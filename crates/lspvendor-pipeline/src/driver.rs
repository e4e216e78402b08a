//! Pipeline driver - runs one target through every stage in order.

use chrono::{DateTime, Utc};
use derive_more::Display;
use lspvendor_core::executor::Executor;
use lspvendor_core::{Error, Result, RunId, TargetConfig, TargetRegistry};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};

use crate::collect::ArtifactCollector;
use crate::fetch::SourceFetcher;
use crate::profile::{OnExisting, RunProfile};
use crate::runner::BuildRunner;
use crate::workspace::WorkspaceState;

/// The stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[display("prepare workspace")]
    PrepareWorkspace,
    #[display("fetch source")]
    FetchSource,
    #[display("repo build")]
    RepoBuild,
    #[display("server build")]
    ServerBuild,
    #[display("collect artifacts")]
    CollectArtifacts,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::PrepareWorkspace,
        Stage::FetchSource,
        Stage::RepoBuild,
        Stage::ServerBuild,
        Stage::CollectArtifacts,
    ];
}

/// Position of a run in the linear state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PipelineState {
    Start,
    WorkspacePrepared,
    SourceReady,
    RepoBuilt,
    ServerBuilt,
    ArtifactsCollected,
    Done,
    Failed,
}

impl PipelineState {
    /// State reached once `stage` succeeds.
    pub fn after(stage: Stage) -> Self {
        match stage {
            Stage::PrepareWorkspace => PipelineState::WorkspacePrepared,
            Stage::FetchSource => PipelineState::SourceReady,
            Stage::RepoBuild => PipelineState::RepoBuilt,
            Stage::ServerBuild => PipelineState::ServerBuilt,
            Stage::CollectArtifacts => PipelineState::ArtifactsCollected,
        }
    }
}

/// State of a stage during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState {
    Pending,
    Running,
    Succeeded,
    Failed { message: String },
    Skipped { reason: String },
}

impl StageState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageState::Succeeded | StageState::Failed { .. } | StageState::Skipped { .. }
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StageState::Succeeded)
    }
}

#[derive(Debug, Clone)]
pub struct StageRecord {
    pub stage: Stage,
    pub state: StageState,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Result of one extraction run.
#[derive(Debug)]
pub struct PipelineResult {
    pub run_id: RunId,
    pub target: String,
    pub success: bool,
    /// `Done` on success, otherwise the last state reached before failing.
    pub reached: PipelineState,
    pub stages: Vec<StageRecord>,
    pub output_dir: Option<PathBuf>,
    /// Names of the entries copied into `output_dir`.
    pub artifacts: Vec<String>,
    pub error: Option<Error>,
}

impl PipelineResult {
    fn new(run_id: RunId, target: &str) -> Self {
        Self {
            run_id,
            target: target.to_string(),
            success: false,
            reached: PipelineState::Start,
            stages: Stage::ALL
                .iter()
                .map(|&stage| StageRecord {
                    stage,
                    state: StageState::Pending,
                    started_at: None,
                    finished_at: None,
                })
                .collect(),
            output_dir: None,
            artifacts: Vec::new(),
            error: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        if self.success {
            PipelineState::Done
        } else {
            PipelineState::Failed
        }
    }

    pub fn stage(&self, stage: Stage) -> &StageState {
        // Every stage is recorded at construction.
        &self.stages[stage as usize].state
    }

    fn record_mut(&mut self, stage: Stage) -> &mut StageRecord {
        &mut self.stages[stage as usize]
    }

    fn finish(mut self) -> Self {
        let reason = match &self.error {
            Some(Error::NotFound(_)) => "unknown target".to_string(),
            _ => "previous stage failed".to_string(),
        };
        for record in &mut self.stages {
            if record.state == StageState::Pending {
                record.state = StageState::Skipped {
                    reason: reason.clone(),
                };
            }
        }
        self.success = self.error.is_none();
        if self.success {
            self.reached = PipelineState::Done;
        }
        self
    }

    /// Turn a failed run into its error.
    pub fn into_result(mut self) -> Result<Self> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

/// Drives the fixed stage sequence for targets from one registry.
pub struct Pipeline {
    registry: TargetRegistry,
    profile: RunProfile,
    fetcher: SourceFetcher,
    runner: BuildRunner,
    collector: ArtifactCollector,
}

impl Pipeline {
    pub fn new(registry: TargetRegistry, executor: Arc<dyn Executor>, profile: RunProfile) -> Self {
        Self {
            fetcher: SourceFetcher::new(executor.clone(), profile.on_existing),
            runner: BuildRunner::new(executor.clone()),
            collector: ArtifactCollector::new(executor),
            registry,
            profile,
        }
    }

    /// Run every stage for `target_name` under `base_dir`.
    ///
    /// The first failing stage ends the run; later stages are recorded as
    /// skipped. With a teardown profile the workspace is removed on every
    /// exit path once it was created, except when strict fetching refused a
    /// repository left over from an earlier run.
    pub async fn extract(&self, target_name: &str, base_dir: &Path) -> PipelineResult {
        let run_id = RunId::new();
        let span = info_span!("extract", run_id = %run_id, target = %target_name);
        self.extract_inner(run_id, target_name, base_dir)
            .instrument(span)
            .await
    }

    async fn extract_inner(&self, run_id: RunId, target_name: &str, base_dir: &Path) -> PipelineResult {
        let mut result = PipelineResult::new(run_id, target_name);

        let target = match self.registry.lookup(target_name) {
            Ok(target) => target,
            Err(e) => {
                error!(error = %e, "Cannot extract");
                result.error = Some(e);
                return result.finish();
            }
        };

        info!(
            repo = %target.repo_location,
            revision = ?target.repo_revision,
            mode = %self.profile.on_existing,
            "Starting extraction"
        );

        let Some((state, leftover)) = run_stage(&mut result, Stage::PrepareWorkspace, async {
            let state = WorkspaceState::prepare(base_dir, &target.name, &self.profile).await?;
            let leftover = state.repo_exists().await?;
            Ok::<_, Error>((state, leftover))
        })
        .await
        else {
            return result.finish();
        };
        result.output_dir = Some(state.output_dir.clone());

        self.run_stages(&mut result, target, &state).await;

        // Strict fetching refused this clone; it belongs to an earlier run.
        let keep_leftover = leftover && self.profile.on_existing == OnExisting::Error;
        if self.profile.teardown && keep_leftover {
            warn!(dir = %state.target_dir.display(), "Leaving workspace from an earlier run in place");
        } else if self.profile.teardown {
            if let Err(e) = state.teardown().await {
                if result.error.is_none() {
                    error!(error = %e, "Workspace teardown failed");
                    result.error = Some(e);
                } else {
                    warn!(error = %e, "Workspace teardown failed after an earlier error");
                }
            }
        }

        let result = result.finish();
        if result.success {
            info!(output = %state.output_dir.display(), artifacts = result.artifacts.len(), "Extraction complete");
        }
        result
    }

    async fn run_stages(&self, result: &mut PipelineResult, target: &TargetConfig, state: &WorkspaceState) {
        if run_stage(result, Stage::FetchSource, self.fetcher.ensure(state, target))
            .await
            .is_none()
        {
            return;
        }

        if run_stage(result, Stage::RepoBuild, self.runner.run(&target.repo_build_steps, &state.repo_dir))
            .await
            .is_none()
        {
            return;
        }

        let server_dir = state.server_dir(target);
        let server_build = async {
            let exists = tokio::fs::try_exists(&server_dir)
                .await
                .map_err(|e| Error::workspace(&server_dir, e))?;
            if !exists {
                return Err(Error::Build {
                    step: format!("enter {}", target.server_subpath.display()),
                    dir: server_dir.clone(),
                    message: "server directory not found".to_string(),
                });
            }
            self.runner.run(&target.server_build_steps, &server_dir).await
        };
        if run_stage(result, Stage::ServerBuild, server_build).await.is_none() {
            return;
        }

        let artifact_dir = state.artifact_dir(target);
        let collect = async {
            state.create_output_dir().await?;
            self.collector.collect(&artifact_dir, &state.output_dir).await
        };
        if let Some(artifacts) = run_stage(result, Stage::CollectArtifacts, collect).await {
            result.artifacts = artifacts;
        }
    }
}

/// Run one stage, recording its state and timing. `None` means it failed.
async fn run_stage<T>(
    result: &mut PipelineResult,
    stage: Stage,
    fut: impl Future<Output = Result<T>>,
) -> Option<T> {
    info!(stage = %stage, "Stage started");
    {
        let record = result.record_mut(stage);
        record.state = StageState::Running;
        record.started_at = Some(Utc::now());
    }

    let outcome = fut.await;

    let record = result.record_mut(stage);
    record.finished_at = Some(Utc::now());
    match outcome {
        Ok(value) => {
            info!(stage = %stage, "Stage completed successfully");
            record.state = StageState::Succeeded;
            result.reached = PipelineState::after(stage);
            Some(value)
        }
        Err(e) => {
            error!(stage = %stage, error = %e, "Stage failed");
            record.state = StageState::Failed {
                message: e.to_string(),
            };
            result.error = Some(e);
            None
        }
    }
}
