//! Bracket and paren line output: `path:line:col: [LEVEL] message (rule)`.
//!
//! This is yamllint's `parsable` format.

use super::{by_file, split_path, take_number};
use lintmux_core::{FileResult, Issue, Severity};

/// Rule id used when a line carries no trailing `(rule)`.
const FALLBACK_RULE: &str = "yamllint";

/// Parses bracketed output into per-file results.
#[must_use]
pub fn parse(output: &str, language: &str) -> Vec<FileResult> {
    by_file(language, output.lines().filter_map(parse_line))
}

fn parse_line(line: &str) -> Option<(String, Issue)> {
    let (path, rest) = split_path(line)?;
    let (line_no, rest) = take_number(rest, ':')?;
    let (column, rest) = take_number(rest, ':')?;

    let rest = rest.trim_start().strip_prefix('[')?;
    let (level, rest) = rest.split_once(']')?;
    let severity = if level.trim().eq_ignore_ascii_case("error") {
        Severity::Error
    } else {
        Severity::Warning
    };

    let body = rest.trim();
    let (message, rule) = match body.strip_suffix(')').and_then(|b| b.rsplit_once(" (")) {
        Some((message, rule)) if !rule.is_empty() && !rule.contains(' ') => (message, rule),
        _ => (body, FALLBACK_RULE),
    };

    Some((
        path.to_string(),
        Issue::new(line_no, column, rule, message.trim(), severity),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_with_rule() {
        let results = parse(
            "config.yml:3:1: [error] too many blank lines (3 > 0) (empty-lines)\n",
            "yaml",
        );
        let issue = &results[0].issues[0];
        assert_eq!(results[0].path, Path::new("config.yml"));
        assert_eq!((issue.line, issue.column), (3, 1));
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.rule, "empty-lines");
        assert_eq!(issue.message, "too many blank lines (3 > 0)");
        assert!(!issue.fixable);
    }

    #[test]
    fn test_warning_level() {
        let results = parse(
            "ci.yaml:1:1: [warning] missing document start \"---\" (document-start)",
            "yaml",
        );
        assert_eq!(results[0].issues[0].severity, Severity::Warning);
        assert_eq!(results[0].issues[0].rule, "document-start");
    }

    #[test]
    fn test_missing_rule_falls_back() {
        let results = parse(
            "a.yml:4:9: [error] syntax error: mapping values are not allowed here",
            "yaml",
        );
        let issue = &results[0].issues[0];
        assert_eq!(issue.rule, FALLBACK_RULE);
        assert_eq!(issue.message, "syntax error: mapping values are not allowed here");
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert!(parse("", "yaml").is_empty());
        assert!(parse("a.yml:1:1: error without brackets", "yaml").is_empty());
        assert!(parse("a.yml:1:1: [error unterminated", "yaml").is_empty());
        assert!(parse("not yamllint output at all", "yaml").is_empty());
    }

    #[test]
    fn test_interleaved_files_are_attributed() {
        let output = "\
a.yml:1:1: [warning] missing document start \"---\" (document-start)
b.yml:2:5: [error] wrong indentation: expected 2 but found 4 (indentation)
a.yml:9:81: [error] line too long (92 > 80 characters) (line-length)
";
        let results = parse(output, "yaml");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].issues.len(), 2);
        assert_eq!(results[0].issues[1].rule, "line-length");
        assert_eq!(results[1].path, Path::new("b.yml"));
        assert_eq!(results[1].issues[0].rule, "indentation");
    }
}
