//! Slash-rule line output: `path:line[:col] MDxxx/alias message`.
//!
//! This is markdownlint's default format. Only `MD`-prefixed rules are
//! accepted. Every finding is a warning, and only rules markdownlint can
//! rewrite on its own are fixable.

use super::{by_file, split_path};
use lintmux_core::{FileResult, Issue, Severity};

const RULE_PREFIX: &str = "MD";

/// Rules markdownlint fixes reliably with `--fix`.
const FIXABLE_RULES: &[&str] = &["MD004", "MD009", "MD010", "MD012", "MD047"];

/// Parses slash-rule output into per-file results.
#[must_use]
pub fn parse(output: &str, language: &str) -> Vec<FileResult> {
    by_file(language, output.lines().filter_map(parse_line))
}

fn parse_line(line: &str) -> Option<(String, Issue)> {
    let (path, rest) = split_path(line)?;

    let (position, rest) = rest.split_once(' ')?;
    let (line_no, column) = match position.split_once(':') {
        Some((l, c)) => (l.parse::<usize>().ok()?, c.parse::<usize>().ok()?),
        None => (position.parse::<usize>().ok()?, 1),
    };
    if line_no == 0 {
        return None;
    }

    // markdownlint-cli2 inserts a level word before the rule.
    let rest = rest.trim_start();
    let rest = ["error ", "warning "]
        .iter()
        .find_map(|level| rest.strip_prefix(level))
        .unwrap_or(rest)
        .trim_start();

    let (token, message) = rest.split_once(' ').unwrap_or((rest, ""));
    let rule = token.split_once('/').map_or(token, |(id, _)| id);
    if !is_md_rule(rule) {
        return None;
    }

    Some((
        path.to_string(),
        Issue::new(line_no, column.max(1), rule, message.trim(), Severity::Warning)
            .fixable(FIXABLE_RULES.contains(&rule)),
    ))
}

fn is_md_rule(rule: &str) -> bool {
    rule.strip_prefix(RULE_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
