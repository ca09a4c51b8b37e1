//! lintmux CLI tool.
//!
//! Usage:
//! ```bash
//! lintmux check [OPTIONS] [PATHS]...
//! lintmux list-tools
//! lintmux init
//! lintmux clean-cache
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod discovery;

/// Runs many linters over a mixed-language codebase, with caching
#[derive(Parser)]
#[command(name = "lintmux")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LINTMUX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint files and directories
    Check {
        /// Files or directories to lint (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Let tools that can fix issues rewrite files
        #[arg(long)]
        fix: bool,

        /// Ignore the result cache for this run
        #[arg(long)]
        no_cache: bool,

        /// Number of tool invocations to run at once
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Extra ignore patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List built-in tools and whether they are installed
    ListTools,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Delete the result cache
    CleanCache,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON report.
    Json,
    /// One-line-per-issue compact format.
    Compact,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let source = config_resolver::resolve(&cwd, cli.config.as_deref());

    match cli.command {
        Commands::Check {
            paths,
            fix,
            no_cache,
            concurrency,
            format,
            exclude,
        } => {
            let options = commands::check::CheckOptions {
                fix,
                no_cache,
                concurrency,
                format,
                exclude,
            };
            commands::check::run(&cwd, &paths, &options, &source).await
        }
        Commands::ListTools => {
            commands::list_tools::run().await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(&cwd, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CleanCache => {
            commands::clean_cache::run(&cwd, &source).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
