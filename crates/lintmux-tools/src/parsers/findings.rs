//! Flat JSON findings, one record per finding.
//!
//! Shared by shellcheck (`--format=json`, numeric codes rendered as
//! `SC<n>`) and hadolint (`--format json`, string codes such as `DL3008`).
//! shellcheck's `json1` wrapper object (`{"comments": [...]}`) is accepted
//! too.

use super::by_file;
use lintmux_core::{FileResult, Issue, Severity};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Finding {
    file: String,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    column: Option<usize>,
    #[serde(default)]
    end_line: Option<usize>,
    #[serde(default)]
    end_column: Option<usize>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    code: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    fix: Value,
}

impl Finding {
    fn rule(&self) -> String {
        match &self.code {
            Value::Number(n) => format!("SC{n}"),
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => "unknown".to_string(),
        }
    }

    fn severity(&self) -> Severity {
        match self.level.as_deref().unwrap_or_default() {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Only a non-empty `fix.replacements` array makes a finding fixable.
    fn fixable(&self) -> bool {
        self.fix
            .get("replacements")
            .and_then(Value::as_array)
            .is_some_and(|r| !r.is_empty())
    }

    fn into_entry(self) -> (String, Issue) {
        let issue = Issue::new(
            self.line.unwrap_or(1).max(1),
            self.column.unwrap_or(1).max(1),
            self.rule(),
            self.message.clone().unwrap_or_default(),
            self.severity(),
        )
        .with_end(self.end_line, self.end_column)
        .fixable(self.fixable());
        (self.file, issue)
    }
}

/// Parses flat findings into per-file results.
#[must_use]
pub fn parse(output: &str, language: &str) -> Vec<FileResult> {
    let records = match serde_json::from_str::<Value>(output.trim()) {
        Ok(Value::Array(records)) => records,
        Ok(Value::Object(mut wrapper)) => match wrapper.remove("comments") {
            Some(Value::Array(records)) => records,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    by_file(
        language,
        records
            .into_iter()
            .filter_map(|r| serde_json::from_value::<Finding>(r).ok())
            .map(Finding::into_entry),
    )
}
