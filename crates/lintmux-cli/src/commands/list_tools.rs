//! List tools command implementation.

use lintmux_core::Executor;
use lintmux_tools::builtin_registry;

/// Runs the list-tools command.
pub async fn run() {
    let registry = builtin_registry();
    let executor = Executor::new();

    println!("Available tools:\n");
    println!(
        "{:<14} {:<12} {:<5} {:<10} Description",
        "Name", "Language", "Fix", "Installed"
    );
    println!("{}", "-".repeat(80));

    let mut missing = Vec::new();
    for tool in registry.descriptors() {
        let installed = executor.command_exists(&tool.command).await;
        if !installed {
            missing.push(tool);
        }
        println!(
            "{:<14} {:<12} {:<5} {:<10} {}",
            tool.name,
            tool.language,
            if tool.can_fix { "yes" } else { "no" },
            if installed { "yes" } else { "no" },
            tool.description
        );
    }

    if !missing.is_empty() {
        println!("\nTo install missing tools:");
        for tool in missing {
            println!("  {:<14} {}", tool.name, tool.install_hint);
        }
    }

    println!("\nDisable a tool per language in lintmux.toml, e.g.:");
    println!("  [languages.python.tools.flake8]");
    println!("  enabled = false");
}
