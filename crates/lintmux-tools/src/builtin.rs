//! Built-in tool set.

use crate::command::{CommandTool, Dialect, OutputStream};
use lintmux_core::{ToolDescriptor, ToolRegistry};
use std::sync::Arc;

/// Returns the flake8 runner (python).
#[must_use]
pub fn flake8() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("flake8", "python", "flake8")
            .description("Python style guide enforcement")
            .config_files([".flake8", "setup.cfg", "tox.ini"])
            .install_hint("pip install flake8"),
        Dialect::Positional,
    )
    .config_flag("--config")
}

/// Returns the eslint runner (javascript and typescript).
#[must_use]
pub fn eslint() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("eslint", "javascript", "eslint")
            .description("Pluggable JavaScript and TypeScript linter")
            .config_files([
                "eslint.config.js",
                "eslint.config.mjs",
                ".eslintrc.json",
                ".eslintrc.js",
            ])
            .can_fix(true)
            .install_hint("npm install -g eslint"),
        Dialect::Eslint,
    )
    .check_args(["--format", "json", "--no-error-on-unmatched-pattern"])
    .fix_args(["--fix", "--no-error-on-unmatched-pattern"])
    .config_flag("--config")
}

/// Returns the shellcheck runner (shell).
#[must_use]
pub fn shellcheck() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("shellcheck", "shell", "shellcheck")
            .description("Static analysis for shell scripts")
            .config_files([".shellcheckrc"])
            .install_hint("apt install shellcheck, or brew install shellcheck"),
        Dialect::Findings,
    )
    .check_args(["--format=json"])
    .config_flag("--rcfile")
}

/// Returns the yamllint runner (yaml).
#[must_use]
pub fn yamllint() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("yamllint", "yaml", "yamllint")
            .description("Linter for YAML files")
            .config_files([".yamllint", ".yamllint.yaml", ".yamllint.yml"])
            .install_hint("pip install yamllint"),
        Dialect::Bracketed,
    )
    .check_args(["--format", "parsable"])
    .config_flag("--config-file")
}

/// Returns the markdownlint runner (markdown).
#[must_use]
pub fn markdownlint() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("markdownlint", "markdown", "markdownlint")
            .description("Style checker for Markdown files")
            .config_files([".markdownlint.json", ".markdownlint.yaml", ".markdownlintrc"])
            .can_fix(true)
            .install_hint("npm install -g markdownlint-cli"),
        Dialect::SlashRule,
    )
    .fix_args(["--fix"])
    .config_flag("--config")
    .stream(OutputStream::Combined)
}

/// Returns the hadolint runner (dockerfile).
#[must_use]
pub fn hadolint() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("hadolint", "dockerfile", "hadolint")
            .description("Dockerfile linter")
            .config_files([".hadolint.yaml", ".hadolint.yml"])
            .install_hint("brew install hadolint, or see https://github.com/hadolint/hadolint"),
        Dialect::Findings,
    )
    .check_args(["--format", "json", "--no-fail"])
    .config_flag("--config")
}

/// Output template for checkmake, one positional line per violation.
///
/// File-level rules (`minphony`, `phonydeclared`) carry no usable line
/// number and are pinned to line 1.
const CHECKMAKE_FORMAT: &str = "{{.FileName}}:{{if gt .LineNumber 0}}{{.LineNumber}}{{else}}1{{end}}:1: {{.Rule}} {{.Violation}}\n";

/// Returns the checkmake runner (makefile).
#[must_use]
pub fn checkmake() -> CommandTool {
    CommandTool::new(
        ToolDescriptor::new("checkmake", "makefile", "checkmake")
            .description("Linter for Makefiles")
            .config_files(["checkmake.ini"])
            .install_hint("go install github.com/mrtazz/checkmake/cmd/checkmake@latest"),
        Dialect::Positional,
    )
    .check_args([format!("--format={CHECKMAKE_FORMAT}")])
    .config_flag("--config")
}

/// Returns every built-in tool.
///
/// Includes:
/// - `flake8` (python)
/// - `eslint` (javascript, fixable)
/// - `shellcheck` (shell)
/// - `yamllint` (yaml)
/// - `markdownlint` (markdown, fixable)
/// - `hadolint` (dockerfile)
/// - `checkmake` (makefile)
#[must_use]
pub fn builtin_tools() -> Vec<CommandTool> {
    vec![
        flake8(),
        eslint(),
        shellcheck(),
        yamllint(),
        markdownlint(),
        hadolint(),
        checkmake(),
    ]
}

/// Returns a registry holding every built-in tool.
///
/// Plugin tools can be added afterwards with [`ToolRegistry::register`];
/// one registered under a built-in's name replaces it.
#[must_use]
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in builtin_tools() {
        registry.register(Arc::new(tool));
    }
    registry
}
