//! Shared output formatting for lint reports.

use anyhow::Result;
use lintmux_core::{LintReport, RunSummary, Severity};
use std::path::Path;

use crate::OutputFormat;

/// Print a lint report in the specified format.
///
/// Paths are shown relative to `root` where possible.
pub fn print(report: &LintReport, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, root),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => {
            let out = render_compact(report, root);
            if !out.is_empty() {
                println!("{out}");
            }
        }
    }
    Ok(())
}

fn display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_text(report: &LintReport, root: &Path) {
    for (path, issue) in report.issues() {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} at {}:{}:{}",
            issue.rule,
            display(path, root),
            issue.line,
            issue.column,
        );
        println!("  {}: {}", severity_indicator, issue.message);
        if issue.fixable {
            println!("  = help: fixable with --fix");
        }
        println!();
    }

    let summary = &report.summary;
    let summary_color = if summary.errors > 0 {
        "\x1b[31m"
    } else if summary.warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}{} ({:.2}s)\x1b[0m",
        summary_color,
        summary_line(summary),
        summary.duration.as_secs_f64()
    );
}

fn summary_line(summary: &RunSummary) -> String {
    let mut line = format!(
        "Found {} error(s), {} warning(s) in {} file(s)",
        summary.errors, summary.warnings, summary.files
    );
    if summary.fixable > 0 {
        line.push_str(&format!(", {} fixable", summary.fixable));
    }
    if let Some(fixed) = summary.fixed {
        line.push_str(&format!(", {fixed} fixed"));
    }
    line
}

fn print_json(report: &LintReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

/// One line per issue: `path:line:col: severity [rule] message`.
fn render_compact(report: &LintReport, root: &Path) -> String {
    report
        .issues()
        .map(|(path, issue)| {
            format!(
                "{}:{}:{}: {} [{}] {}",
                display(path, root),
                issue.line,
                issue.column,
                issue.severity,
                issue.rule,
                issue.message,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
