//! Language classification and grouping of discovered files.

use crate::config::Config;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Language tag for Dockerfiles.
pub const DOCKERFILE: &str = "dockerfile";

/// Language tag for Makefiles.
pub const MAKEFILE: &str = "makefile";

/// Matches file names that identify a language on their own.
///
/// Checked before any extension rule.
fn special_filename(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    if lower == "dockerfile" || lower.starts_with("dockerfile.") {
        return Some(DOCKERFILE);
    }
    if lower == "makefile" || lower == "gnumakefile" {
        return Some(MAKEFILE);
    }
    None
}

/// Maps a file path to the language tag of the first enabled language claiming it.
///
/// Special file names (`Dockerfile`, `Dockerfile.*`, `Makefile`,
/// `GNUmakefile`) win over extension rules, provided their language is
/// enabled. Otherwise each enabled language's extension list is scanned in
/// language-name order and matched case-insensitively. An entry with a
/// leading dot is an extension; any other entry is an exact file name.
#[must_use]
pub fn classify(path: &Path, config: &Config) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;

    if let Some(language) = special_filename(file_name) {
        return config.language(language).map(|_| language.to_string());
    }

    let file_name = file_name.to_ascii_lowercase();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));

    config
        .enabled_languages()
        .find(|(_, lang)| {
            lang.extensions.iter().any(|candidate| {
                let candidate = candidate.to_ascii_lowercase();
                if candidate.starts_with('.') {
                    extension.as_deref() == Some(candidate.as_str())
                } else {
                    candidate == file_name
                }
            })
        })
        .map(|(name, _)| name.to_string())
}

/// Groups files by language tag, preserving input order within each group.
///
/// Files that do not classify are dropped.
#[must_use]
pub fn group(files: &[PathBuf], config: &Config) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        match classify(file, config) {
            Some(language) => groups.entry(language).or_default().push(file.clone()),
            None => tracing::debug!("No language for {}", file.display()),
        }
    }
    groups
}
