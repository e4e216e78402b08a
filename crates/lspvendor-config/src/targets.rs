//! Target definition parsing.

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use lspvendor_core::{BuildStep, TargetConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read and parse a KDL target file.
pub fn load_targets_file(path: &Path) -> ConfigResult<Vec<TargetConfig>> {
    let content = std::fs::read_to_string(path)?;
    let targets = parse_targets(&content)?;
    debug!(path = %path.display(), count = targets.len(), "Loaded target definitions");
    Ok(targets)
}

/// Parse target definitions from KDL text.
pub fn parse_targets(kdl: &str) -> ConfigResult<Vec<TargetConfig>> {
    let doc: KdlDocument = kdl.parse()?;

    let mut targets = Vec::new();
    let mut seen = HashSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "target" => {
                let target = parse_target(node)?;
                if !seen.insert(target.name.clone()) {
                    return Err(ConfigError::Duplicate(format!("target '{}'", target.name)));
                }
                targets.push(target);
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(targets)
}

fn parse_target(node: &KdlNode) -> ConfigResult<TargetConfig> {
    let name = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::MissingField("target name".to_string()))?;

    let mut repo_location = None;
    let mut repo_revision = None;
    let mut repo_build_steps = Vec::new();
    let mut server_subpath = None;
    let mut server_build_steps = Vec::new();
    let mut output_subpath = None;
    let mut artifact_name = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "repo" => {
                    repo_location = Some(required_string(child, &name)?);
                }
                "revision" => {
                    repo_revision = Some(required_string(child, &name)?);
                }
                "repo-step" => {
                    repo_build_steps.push(parse_step(child, &name)?);
                }
                "server-path" => {
                    server_subpath = Some(PathBuf::from(required_string(child, &name)?));
                }
                "server-step" => {
                    server_build_steps.push(parse_step(child, &name)?);
                }
                "output-path" => {
                    output_subpath = Some(PathBuf::from(required_string(child, &name)?));
                }
                "artifact" => {
                    artifact_name = Some(required_string(child, &name)?);
                }
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("target '{}'", name),
                        message: format!("unknown field '{}'", other),
                    });
                }
            }
        }
    }

    let repo_location = repo_location
        .ok_or_else(|| ConfigError::MissingField(format!("repo for target '{}'", name)))?;
    let server_subpath = server_subpath
        .ok_or_else(|| ConfigError::MissingField(format!("server-path for target '{}'", name)))?;
    let output_subpath = output_subpath
        .ok_or_else(|| ConfigError::MissingField(format!("output-path for target '{}'", name)))?;

    Ok(TargetConfig {
        artifact_name: artifact_name.unwrap_or_else(|| name.clone()),
        name,
        repo_location,
        repo_revision,
        repo_build_steps,
        server_subpath,
        server_build_steps,
        output_subpath,
    })
}

/// A single argument is a command line split on whitespace; several
/// arguments are taken as program followed by verbatim arguments.
fn parse_step(node: &KdlNode, target: &str) -> ConfigResult<BuildStep> {
    let args = get_all_string_args(node);
    match args.as_slice() {
        [] => Err(ConfigError::InvalidValue {
            field: format!("{} in target '{}'", node.name().value(), target),
            message: "expected a command".to_string(),
        }),
        [line] => Ok(BuildStep::parse(line)?),
        [program, rest @ ..] => Ok(BuildStep::new(program.clone(), rest.iter().cloned())),
    }
}

fn required_string(node: &KdlNode, target: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::InvalidValue {
        field: format!("{} in target '{}'", node.name().value(), target),
        message: "expected a string value".to_string(),
    })
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}
