//! Colon-delimited positional output: `path:line:col: CODE message`.
//!
//! This is the default flake8 format. Codes starting with `E` are errors,
//! everything else is a warning. Nothing is fixable.

use super::{by_file, split_path, take_number};
use lintmux_core::{FileResult, Issue, Severity};

/// Parses positional output into per-file results.
#[must_use]
pub fn parse(output: &str, language: &str) -> Vec<FileResult> {
    by_file(language, output.lines().filter_map(parse_line))
}

fn parse_line(line: &str) -> Option<(String, Issue)> {
    let (path, rest) = split_path(line)?;
    let (line_no, rest) = take_number(rest, ':')?;
    let (column, rest) = take_number(rest, ':')?;

    let rest = rest.trim_start();
    let (code, message) = rest.split_once(' ').unwrap_or((rest, ""));
    if code.is_empty() {
        return None;
    }

    let severity = if code.starts_with('E') {
        Severity::Error
    } else {
        Severity::Warning
    };

    Some((
        path.to_string(),
        Issue::new(line_no, column, code, message.trim(), severity),
    ))
}
