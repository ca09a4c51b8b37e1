//! File discovery: expands paths into the list of files to lint.

use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Expands `paths` into absolute, de-duplicated, sorted file paths.
///
/// Directories are walked honoring `.gitignore`; hidden files are kept so
/// dotfiles such as CI workflows are linted. Walked files matching any of
/// `ignore` (tested against both the absolute path and the path relative to
/// the walked directory) are dropped. Files named explicitly are always kept.
pub fn discover(cwd: &Path, paths: &[PathBuf], ignore: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = ignore
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
        .collect::<Result<Vec<_>>>()?;

    let mut files = BTreeSet::new();
    for path in paths {
        let path = if path.is_absolute() {
            path.clone()
        } else {
            cwd.join(path)
        };

        if path.is_file() {
            files.insert(normalize(&path));
        } else if path.is_dir() {
            walk(&path, &patterns, &mut files)?;
        } else {
            bail!("Path not found: {}", path.display());
        }
    }

    Ok(files.into_iter().collect())
}

fn walk(root: &Path, patterns: &[Pattern], files: &mut BTreeSet<PathBuf>) -> Result<()> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in builder.build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if patterns
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(relative))
        {
            tracing::debug!("Ignoring: {}", path.display());
            continue;
        }

        files.insert(normalize(path));
    }
    Ok(())
}

/// Drops `.` components so `./a.py` and `a.py` collapse to one entry.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
