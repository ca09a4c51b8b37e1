//! Core types for lint issues, per-file results and run summaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Severity level for a lint issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding reported by one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// End line, when the tool reports a range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    /// End column, when the tool reports a range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    /// Human-readable message.
    pub message: String,
    /// Rule identifier as reported by the tool (e.g., "E302", "semi").
    pub rule: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Whether the tool can fix this issue automatically.
    pub fixable: bool,
}

impl Issue {
    /// Creates a new non-fixable issue without an end position.
    #[must_use]
    pub fn new(
        line: usize,
        column: usize,
        rule: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            line,
            column,
            end_line: None,
            end_column: None,
            message: message.into(),
            rule: rule.into(),
            severity,
            fixable: false,
        }
    }

    /// Sets the end position of this issue.
    #[must_use]
    pub fn with_end(mut self, end_line: Option<usize>, end_column: Option<usize>) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    /// Marks this issue as fixable (or not).
    #[must_use]
    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, self.severity, self.rule, self.message
        )
    }
}

/// All issues for one file, as produced by one tool or merged across tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path of the file these issues belong to.
    pub path: PathBuf,
    /// Language tag the file was classified as.
    pub language: String,
    /// Issues in tool-output order.
    pub issues: Vec<Issue>,
    /// Number of issues that are fixable.
    pub fixable: usize,
    /// Number of issues fixed, only present for fix-mode runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<usize>,
}

impl FileResult {
    /// Creates a result, deriving the fixable count from the issues.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>, issues: Vec<Issue>) -> Self {
        let fixable = issues.iter().filter(|i| i.fixable).count();
        Self {
            path: path.into(),
            language: language.into(),
            issues,
            fixable,
            fixed: None,
        }
    }

    /// Creates a result without any issues.
    #[must_use]
    pub fn clean(path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self::new(path, language, Vec::new())
    }

    /// Sets the fixed count.
    #[must_use]
    pub fn with_fixed(mut self, fixed: usize) -> Self {
        self.fixed = Some(fixed);
        self
    }

    /// Counts issues of the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Returns true if any issue is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Folds another partial result for the same path into this one.
    ///
    /// Issues are appended, fixable counts added, and fixed counts added
    /// when the other side carries one.
    pub fn merge(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.fixable += other.fixable;
        if let Some(fixed) = other.fixed {
            self.fixed = Some(self.fixed.unwrap_or(0) + fixed);
        }
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of distinct files with a result.
    pub files: usize,
    /// Number of error-severity issues.
    pub errors: usize,
    /// Number of warning-severity issues.
    pub warnings: usize,
    /// Number of fixable issues.
    pub fixable: usize,
    /// Number of fixed issues, only present for fix-mode runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<usize>,
    /// Wall-clock duration of the run.
    #[serde(with = "duration_ms", rename = "duration_ms")]
    pub duration: Duration,
}

impl RunSummary {
    /// Computes the summary for a set of merged file results.
    ///
    /// `fixed` is only summed when `fix_mode` is set.
    #[must_use]
    pub fn from_results(results: &[FileResult], fix_mode: bool, duration: Duration) -> Self {
        let mut summary = Self {
            files: results.len(),
            duration,
            ..Self::default()
        };
        for result in results {
            summary.errors += result.count(Severity::Error);
            summary.warnings += result.count(Severity::Warning);
            summary.fixable += result.fixable;
        }
        if fix_mode {
            summary.fixed = Some(results.iter().filter_map(|r| r.fixed).sum());
        }
        summary
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Output of a complete run: one result per file plus totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintReport {
    /// Merged per-file results, in first-seen order.
    pub results: Vec<FileResult>,
    /// Run totals.
    pub summary: RunSummary,
}

impl LintReport {
    /// Returns true if any error-severity issue was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Iterates over `(path, issue)` pairs across all files.
    pub fn issues(&self) -> impl Iterator<Item = (&Path, &Issue)> {
        self.results
            .iter()
            .flat_map(|r| r.issues.iter().map(move |i| (r.path.as_path(), i)))
    }

    /// Finds the result for a path.
    #[must_use]
    pub fn result_for(&self, path: &Path) -> Option<&FileResult> {
        self.results.iter().find(|r| r.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, fixable: bool) -> Issue {
        Issue::new(10, 5, "E302", "expected 2 blank lines", severity).fixable(fixable)
    }

    #[test]
    fn file_result_counts_fixable_issues() {
        let result = FileResult::new(
            "a.py",
            "python",
            vec![
                issue(Severity::Error, true),
                issue(Severity::Warning, false),
                issue(Severity::Warning, true),
            ],
        );
        assert_eq!(result.fixable, 2);
        assert_eq!(result.count(Severity::Warning), 2);
        assert!(result.has_errors());
        assert!(result.fixed.is_none());
    }

    #[test]
    fn merge_sums_issues_and_counts() {
        let mut a = FileResult::new("a.py", "python", vec![issue(Severity::Error, true)]);
        let b = FileResult::new(
            "a.py",
            "python",
            vec![issue(Severity::Warning, true), issue(Severity::Info, false)],
        );
        a.merge(b);
        assert_eq!(a.issues.len(), 3);
        assert_eq!(a.fixable, 2);
        assert!(a.fixed.is_none());
    }

    #[test]
    fn merge_adds_fixed_counts_when_present() {
        let mut a = FileResult::clean("a.md", "markdown").with_fixed(2);
        a.merge(FileResult::clean("a.md", "markdown").with_fixed(3));
        assert_eq!(a.fixed, Some(5));

        let mut b = FileResult::clean("b.md", "markdown");
        b.merge(FileResult::clean("b.md", "markdown").with_fixed(1));
        assert_eq!(b.fixed, Some(1));
    }

    #[test]
    fn summary_totals_severities() {
        let results = vec![
            FileResult::new(
                "a.py",
                "python",
                vec![issue(Severity::Error, false), issue(Severity::Warning, true)],
            ),
            FileResult::new("b.py", "python", vec![issue(Severity::Info, false)]),
            FileResult::clean("c.py", "python"),
        ];
        let summary = RunSummary::from_results(&results, false, Duration::from_millis(12));
        assert_eq!(summary.files, 3);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.fixable, 1);
        assert_eq!(summary.fixed, None);
    }

    #[test]
    fn summary_sums_fixed_only_in_fix_mode() {
        let results = vec![
            FileResult::clean("a.js", "javascript").with_fixed(4),
            FileResult::clean("b.js", "javascript"),
        ];
        let summary = RunSummary::from_results(&results, true, Duration::ZERO);
        assert_eq!(summary.fixed, Some(4));
    }

    #[test]
    fn summary_serializes_duration_as_millis() {
        let summary = RunSummary {
            duration: Duration::from_millis(1500),
            ..RunSummary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["duration_ms"], 1500);
        assert!(json.get("fixed").is_none());
    }

    #[test]
    fn file_result_roundtrips_through_json() {
        let result = FileResult::new(
            "src/a.ts",
            "javascript",
            vec![issue(Severity::Warning, true).with_end(Some(10), Some(9))],
        );
        let json = serde_json::to_string(&result).unwrap();
        let back: FileResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
