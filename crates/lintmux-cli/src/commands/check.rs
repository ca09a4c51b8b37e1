//! Check command implementation.

use anyhow::{Context, Result};
use lintmux_core::Scheduler;
use lintmux_tools::builtin_registry;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config_resolver::ConfigSource;
use crate::discovery;
use crate::OutputFormat;

/// Flags of the check command.
pub struct CheckOptions {
    /// Run the fix variant of tools that support it.
    pub fix: bool,
    /// Skip the result cache.
    pub no_cache: bool,
    /// Worker pool width override.
    pub concurrency: Option<usize>,
    /// Report format.
    pub format: OutputFormat,
    /// Ignore patterns added to the configured ones.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Exits with failure when any error-severity issue remains.
pub async fn run(
    cwd: &Path,
    paths: &[PathBuf],
    options: &CheckOptions,
    source: &ConfigSource,
) -> Result<ExitCode> {
    let config = source.load()?;

    let mut ignore = config.ignore.clone();
    ignore.extend(options.exclude.iter().cloned());
    let files = discovery::discover(cwd, paths, &ignore)?;
    tracing::info!("Discovered {} file(s)", files.len());

    let mut builder = Scheduler::builder()
        .root(cwd)
        .config(config)
        .registry(builtin_registry())
        .fix(options.fix)
        .no_cache(options.no_cache);
    if let Some(width) = options.concurrency {
        builder = builder.concurrency(width);
    }
    let scheduler = builder.build().context("Failed to build scheduler")?;

    let report = scheduler.run(&files).await;

    super::output::print(&report, options.format, cwd)?;

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
