//! Targets compiled into the binary.

use lspvendor_core::{BuildStep, TargetConfig, TargetRegistry};
use std::path::PathBuf;

use crate::ConfigResult;

/// The literal target table used when no config file is given.
pub fn builtin_targets() -> ConfigResult<Vec<TargetConfig>> {
    Ok(vec![TargetConfig {
        name: "eslint".to_string(),
        repo_location: "https://github.com/microsoft/vscode-eslint.git".to_string(),
        repo_revision: Some("release/3.0.8".to_string()),
        repo_build_steps: vec![BuildStep::parse("npm install")?],
        server_subpath: PathBuf::from("server"),
        server_build_steps: vec![
            BuildStep::parse("npm install")?,
            BuildStep::parse("npm run webpack")?,
        ],
        output_subpath: PathBuf::from("out"),
        artifact_name: "eslint-lsp".to_string(),
    }])
}

pub fn builtin_registry() -> ConfigResult<TargetRegistry> {
    Ok(TargetRegistry::new(builtin_targets()?)?)
}
