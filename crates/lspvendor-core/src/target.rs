//! Target configuration and build steps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::executor::CommandSpec;
use crate::{Error, Result};

/// URL schemes git is expected to understand.
const SUPPORTED_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "file"];

/// One build command as a program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildStep {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace.
    ///
    /// There is no quoting support: `echo "a b"` yields the arguments
    /// `"a` and `b"`. Use [`BuildStep::new`] when an argument contains spaces.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Configuration("build step is empty".to_string()))?;
        Ok(Self::new(program, parts))
    }

    /// Command spec for running this step inside `dir`.
    pub fn command(&self, dir: &Path) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(self.args.iter().cloned())
            .current_dir(dir)
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Extraction configuration for one language server target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Registry key and workspace directory name.
    pub name: String,
    /// Location handed to `git clone`.
    pub repo_location: String,
    /// Tag or branch to pin to. `None` tracks the default branch.
    pub repo_revision: Option<String>,
    /// Run from the repository root.
    pub repo_build_steps: Vec<BuildStep>,
    /// Directory inside the repository holding the server.
    pub server_subpath: PathBuf,
    /// Run from `server_subpath`.
    pub server_build_steps: Vec<BuildStep>,
    /// Directory inside `server_subpath` where artifacts land.
    pub output_subpath: PathBuf,
    /// Name the final product is known by. Descriptive only.
    pub artifact_name: String,
}

impl TargetConfig {
    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_location(&self.name, &self.repo_location)?;
        if let Some(rev) = &self.repo_revision {
            if rev.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "target '{}': revision must not be empty",
                    self.name
                )));
            }
        }
        validate_relative(&self.name, "server path", &self.server_subpath)?;
        validate_relative(&self.name, "output path", &self.output_subpath)?;
        for step in self.repo_build_steps.iter().chain(&self.server_build_steps) {
            if step.program.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "target '{}': build step has no program",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::Configuration(format!(
            "target name '{}' must be a single directory name",
            name
        ))),
    }
}

fn validate_location(name: &str, location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(Error::Configuration(format!(
            "target '{}': repository location is empty",
            name
        )));
    }
    if location.starts_with('-') {
        return Err(Error::Configuration(format!(
            "target '{}': repository location '{}' looks like a command-line option",
            name, location
        )));
    }
    // Anything that is not a URL (scp-style addresses, local paths) goes to git as-is.
    if let Ok(url) = Url::parse(location) {
        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(Error::Configuration(format!(
                "target '{}': unsupported repository scheme '{}'",
                name,
                url.scheme()
            )));
        }
    }
    Ok(())
}

fn validate_relative(name: &str, field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Configuration(format!(
            "target '{}': {} is empty",
            name, field
        )));
    }
    if path.is_absolute() || path.has_root() {
        return Err(Error::Configuration(format!(
            "target '{}': {} '{}' must be relative",
            name,
            field,
            path.display()
        )));
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(Error::Configuration(format!(
            "target '{}': {} '{}' must stay inside the repository",
            name,
            field,
            path.display()
        )));
    }
    Ok(())
}
