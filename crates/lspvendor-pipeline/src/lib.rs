//! Extraction pipeline for lspvendor.
//!
//! Runs one target through a fixed sequence of stages:
//! workspace → fetch → repo build → server build → collect.
//! Every stage is fail-fast and nothing runs concurrently.

pub mod collect;
pub mod driver;
pub mod fetch;
pub mod profile;
pub mod runner;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use collect::ArtifactCollector;
pub use driver::{Pipeline, PipelineResult, PipelineState, Stage, StageRecord, StageState};
pub use fetch::{FetchAction, SourceFetcher};
pub use profile::{OnExisting, OutputLocation, RunProfile};
pub use runner::BuildRunner;
pub use workspace::WorkspaceState;
