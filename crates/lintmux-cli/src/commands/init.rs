//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# lintmux configuration

# Number of tool invocations that may run at once
concurrency = 4

# Kill a tool invocation after this many seconds (default: no limit)
# timeout_secs = 120

# Glob patterns excluded from file discovery
ignore = [
    "**/node_modules/**",
    "**/.git/**",
    "**/target/**",
    "**/.venv/**",
]

[cache]
enabled = true
dir = ".lintmux-cache"

# Languages and the file extensions (or exact file names) they claim.
# A language missing from this file is not linted.

[languages.python]
extensions = [".py", ".pyi"]

[languages.javascript]
extensions = [".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts"]

[languages.shell]
extensions = [".sh", ".bash", ".ksh"]

[languages.yaml]
extensions = [".yml", ".yaml"]

[languages.markdown]
extensions = [".md", ".markdown"]

[languages.dockerfile]
extensions = [".dockerfile"]

[languages.makefile]
extensions = [".mk", ".make"]

# Per-tool settings. Tools are enabled unless disabled here.
#
# [languages.python.tools.flake8]
# enabled = true
# command = "/usr/local/bin/flake8"   # must still be an allowlisted tool
# config = "setup.cfg"
"#;

/// File name written by the init command.
const CONFIG_NAME: &str = "lintmux.toml";

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to choose languages and tools");
    println!("  2. Run: lintmux list-tools");
    println!("  3. Run: lintmux check");

    Ok(())
}
