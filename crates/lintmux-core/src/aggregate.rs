//! Merging of per-task results into one result per file.

use crate::types::FileResult;
use std::collections::HashMap;
use std::path::PathBuf;

/// Merges partial results by path.
///
/// The first occurrence of a path seeds its entry; later ones are folded in
/// with [`FileResult::merge`]. Output keeps first-seen order.
#[must_use]
pub fn aggregate<I>(partials: I) -> Vec<FileResult>
where
    I: IntoIterator<Item = FileResult>,
{
    let mut merged: Vec<FileResult> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for partial in partials {
        if let Some(&slot) = index.get(&partial.path) {
            merged[slot].merge(partial);
        } else {
            index.insert(partial.path.clone(), merged.len());
            merged.push(partial);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, Severity};

    fn partial(path: &str, issues: usize, fixable: usize) -> FileResult {
        let issues = (0..issues)
            .map(|i| {
                Issue::new(i + 1, 1, "R1", "message", Severity::Warning).fixable(i < fixable)
            })
            .collect();
        FileResult::new(path, "python", issues)
    }

    #[test]
    fn test_one_result_per_path() {
        let merged = aggregate(vec![
            partial("a.py", 1, 0),
            partial("b.py", 2, 1),
            partial("a.py", 3, 2),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].path, PathBuf::from("a.py"));
        assert_eq!(merged[0].issues.len(), 4);
        assert_eq!(merged[0].fixable, 2);
        assert_eq!(merged[1].path, PathBuf::from("b.py"));
        assert_eq!(merged[1].fixable, 1);
    }

    #[test]
    fn test_issue_order_follows_input() {
        let first = FileResult::new(
            "a.py",
            "python",
            vec![Issue::new(9, 1, "A", "first tool", Severity::Error)],
        );
        let second = FileResult::new(
            "a.py",
            "python",
            vec![Issue::new(1, 1, "B", "second tool", Severity::Warning)],
        );
        let merged = aggregate(vec![first, second]);
        let rules: Vec<&str> = merged[0].issues.iter().map(|i| i.rule.as_str()).collect();
        assert_eq!(rules, vec!["A", "B"]);
    }

    #[test]
    fn test_fixed_counts_add_up() {
        let merged = aggregate(vec![
            FileResult::clean("a.md", "markdown").with_fixed(1),
            FileResult::clean("a.md", "markdown"),
            FileResult::clean("a.md", "markdown").with_fixed(2),
        ]);
        assert_eq!(merged[0].fixed, Some(3));
    }
}
