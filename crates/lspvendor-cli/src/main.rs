//! lspvendor CLI tool.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lspvendor_executor::LocalExecutor;
use lspvendor_pipeline::{OutputLocation, RunProfile};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lspvendor")]
#[command(about = "Build language servers from source and vendor their artifacts", long_about = None)]
struct Cli {
    /// KDL file with target definitions (replaces the built-in targets)
    #[arg(long, global = true, env = "LSPVENDOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, build and collect a target's artifacts
    Extract {
        /// Language server to extract
        #[arg(long)]
        lsp: Option<String>,
        /// Base working directory (defaults to the system temp dir)
        #[arg(long, env = "LSPVENDOR_WORKDIR")]
        workdir: Option<PathBuf>,
        /// How to treat an existing workspace and where artifacts go
        #[arg(long, value_enum, default_value_t = Mode::Cache)]
        mode: Mode,
        /// Copy artifacts here instead of the mode's default location
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List available targets
    List {
        /// Print full target definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the tools a target needs are on PATH
    Check {
        /// Language server to check
        #[arg(long)]
        lsp: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Update an existing clone in place and keep the workspace
    Cache,
    /// Require a clean workspace, copy to ./out and remove the workspace afterwards
    Ephemeral,
}

impl Mode {
    fn profile(self, out: Option<PathBuf>) -> RunProfile {
        let profile = match self {
            Mode::Cache => RunProfile::cache(),
            Mode::Ephemeral => RunProfile::ephemeral(),
        };
        match out {
            Some(dir) => profile.with_output(OutputLocation::Directory(dir)),
            None => profile,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = lspvendor_config::load_registry(cli.config.as_deref())
        .context("Failed to load target configuration")?;
    tracing::debug!(targets = registry.len(), "Loaded target registry");

    match cli.command {
        Commands::Extract {
            lsp,
            workdir,
            mode,
            out,
        } => {
            let workdir = workdir.unwrap_or_else(std::env::temp_dir);
            commands::extract::run(registry, lsp, workdir, mode.profile(out)).await?;
        }
        Commands::List { json } => {
            commands::list(&registry, json)?;
        }
        Commands::Check { lsp } => {
            commands::check::run(&registry, lsp, Arc::new(LocalExecutor::new())).await?;
        }
    }

    Ok(())
}
