//! Clean-cache command implementation.

use anyhow::Result;
use lintmux_core::Cache;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the clean-cache command.
pub async fn run(cwd: &Path, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let dir = if config.cache.dir.is_absolute() {
        config.cache.dir
    } else {
        cwd.join(&config.cache.dir)
    };

    if !dir.exists() {
        println!("No cache at {}", dir.display());
        return Ok(());
    }

    Cache::new(&dir).clear().await;
    println!("Removed cache at {}", dir.display());
    Ok(())
}
