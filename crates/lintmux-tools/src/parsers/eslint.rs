//! ESLint JSON output: an array of `{filePath, messages[]}` records.
//!
//! Severity `2` is an error, anything else a warning. A message is fixable
//! when it carries a non-null `fix`.

use lintmux_core::{FileResult, Issue, Severity};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file_path: String,
    #[serde(default)]
    messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default)]
    severity: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    column: Option<usize>,
    #[serde(default)]
    end_line: Option<usize>,
    #[serde(default)]
    end_column: Option<usize>,
    #[serde(default)]
    fix: Option<Value>,
}

impl From<Message> for Issue {
    fn from(m: Message) -> Self {
        let severity = if m.severity.as_u64() == Some(2) {
            Severity::Error
        } else {
            Severity::Warning
        };
        Issue::new(
            m.line.unwrap_or(1).max(1),
            m.column.unwrap_or(1).max(1),
            m.rule_id.unwrap_or_else(|| "eslint".to_string()),
            m.message.unwrap_or_default(),
            severity,
        )
        .with_end(m.end_line, m.end_column)
        .fixable(m.fix.is_some())
    }
}

/// Parses ESLint JSON output into per-file results.
///
/// Files without messages are returned as clean results. Records or
/// messages that do not have the expected shape are skipped.
#[must_use]
pub fn parse(output: &str, language: &str) -> Vec<FileResult> {
    let Ok(Value::Array(records)) = serde_json::from_str::<Value>(output.trim()) else {
        return Vec::new();
    };

    records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<FileReport>(record).ok())
        .map(|report| {
            let issues = report
                .messages
                .into_iter()
                .filter_map(|m| serde_json::from_value::<Message>(m).ok())
                .map(Issue::from)
                .collect();
            FileResult::new(report.file_path, language, issues)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_fixable_warning() {
        let output = r#"[{"filePath":"/src/a.ts","messages":[{"ruleId":"semi","severity":1,"fix":{"range":[0,1],"text":";"}}]}]"#;
        let results = parse(output, "javascript");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, Path::new("/src/a.ts"));
        assert_eq!(results[0].fixable, 1);

        let issue = &results[0].issues[0];
        assert_eq!(issue.rule, "semi");
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.fixable);
    }

    #[test]
    fn test_error_with_range_and_null_fix() {
        let output = r#"[{"filePath":"/src/b.js","messages":[
            {"ruleId":"no-undef","severity":2,"message":"'x' is not defined.",
             "line":3,"column":7,"endLine":3,"endColumn":8,"fix":null}
        ]}]"#;
        let results = parse(output, "javascript");
        let issue = &results[0].issues[0];

        assert_eq!(issue.severity, Severity::Error);
        assert_eq!((issue.line, issue.column), (3, 7));
        assert_eq!((issue.end_line, issue.end_column), (Some(3), Some(8)));
        assert!(!issue.fixable);
        assert_eq!(results[0].fixable, 0);
    }

    #[test]
    fn test_fatal_message_without_rule() {
        let output = r#"[{"filePath":"c.js","messages":[{"ruleId":null,"fatal":true,"severity":2,"message":"Parsing error: Unexpected token"}]}]"#;
        let issue = &parse(output, "javascript")[0].issues[0];
        assert_eq!(issue.rule, "eslint");
        assert_eq!((issue.line, issue.column), (1, 1));
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_clean_files_are_kept() {
        let output = r#"[{"filePath":"a.js","messages":[]},{"filePath":"b.js","messages":[{"ruleId":"eqeqeq","severity":2,"message":"m","line":1,"column":1}]}]"#;
        let results = parse(output, "javascript");
        assert_eq!(results.len(), 2);
        assert!(results[0].issues.is_empty());
        assert_eq!(results[1].issues.len(), 1);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert!(parse("", "javascript").is_empty());
        assert!(parse("[{\"filePath\":", "javascript").is_empty());
        assert!(parse("{\"filePath\":\"a.js\"}", "javascript").is_empty());
        assert!(parse("Oops! Something went wrong!", "javascript").is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_message() {
        let output = r#"[{"filePath":"d.js","messages":[
            {"ruleId":"no-console","severity":null,"message":"Unexpected console statement.","line":2,"column":1},
            {"ruleId":"no-debugger","severity":2,"message":null,"line":5,"column":3}
        ]}]"#;
        let results = parse(output, "javascript");
        assert_eq!(results[0].issues.len(), 2);

        let console = &results[0].issues[0];
        assert_eq!(console.rule, "no-console");
        assert_eq!(console.severity, Severity::Warning);

        let debugger = &results[0].issues[1];
        assert_eq!(debugger.severity, Severity::Error);
        assert_eq!(debugger.message, "");
        assert_eq!((debugger.line, debugger.column), (5, 3));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let output = r#"[42, {"messages":[]}, {"filePath":"ok.js","messages":["nope",{"ruleId":"semi","severity":1}]}]"#;
        let results = parse(output, "javascript");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, Path::new("ok.js"));
        assert_eq!(results[0].issues.len(), 1);
    }
}
