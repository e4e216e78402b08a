//! Test doubles shared by the pipeline tests.

use async_trait::async_trait;
use lspvendor_core::executor::{CommandOutcome, CommandSpec, Executor};
use lspvendor_core::{BuildStep, Result, TargetConfig};
use lspvendor_executor::LocalExecutor;
use std::path::PathBuf;
use std::sync::Mutex;

pub fn target(name: &str) -> TargetConfig {
    TargetConfig {
        name: name.to_string(),
        repo_location: format!("https://example.com/{}.git", name),
        repo_revision: None,
        repo_build_steps: vec![BuildStep::new("echo", ["building"])],
        server_subpath: PathBuf::from("server"),
        server_build_steps: vec![BuildStep::new("echo", ["bundling"])],
        output_subpath: PathBuf::from("out"),
        artifact_name: format!("{}-lsp", name),
    }
}

/// Records every command and fakes `git`.
///
/// `git clone` creates the destination with a README and any `seed_dirs`;
/// `git pull` succeeds without touching disk. Programs listed in `failing`
/// exit with status 1. Everything else succeeds, or runs for real when
/// `passthrough` is set.
#[derive(Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<CommandSpec>>,
    failing: Vec<String>,
    seed_dirs: Vec<PathBuf>,
    passthrough: Option<LocalExecutor>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    pub fn seed_dir(mut self, dir: &str) -> Self {
        self.seed_dirs.push(PathBuf::from(dir));
        self
    }

    pub fn passthrough(mut self) -> Self {
        self.passthrough = Some(LocalExecutor::new());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.commands.lock().unwrap().clone()
    }

    fn fake_git(&self, spec: &CommandSpec) {
        if spec.args.first().map(String::as_str) == Some("clone") {
            let dest = PathBuf::from(spec.args.last().unwrap());
            std::fs::create_dir_all(&dest).unwrap();
            std::fs::write(dest.join("README.md"), "cloned").unwrap();
            for dir in &self.seed_dirs {
                std::fs::create_dir_all(dest.join(dir)).unwrap();
            }
        }
    }
}

fn outcome(exit_code: i32) -> CommandOutcome {
    CommandOutcome {
        exit_code: Some(exit_code),
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn can_execute(&self, _spec: &CommandSpec) -> bool {
        true
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        self.commands.lock().unwrap().push(spec.clone());

        if self.failing.contains(&spec.program) {
            return Ok(outcome(1));
        }
        if spec.program == "git" {
            self.fake_git(spec);
            return Ok(outcome(0));
        }
        match &self.passthrough {
            Some(local) => local.run(spec).await,
            None => Ok(outcome(0)),
        }
    }
}
