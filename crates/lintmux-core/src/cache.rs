//! Content-addressed result cache.
//!
//! Entries live at `<root>/<tool>/<digest>.json`, one serialized
//! [`FileResult`] per key. The key depends only on file bytes, so renames and
//! copies share entries and a content change simply misses. Every I/O or
//! decoding failure is handled here: reads degrade to a miss, writes and
//! clears to a logged no-op.

use crate::types::FileResult;
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Hex-encoded SHA-256 of a file's full contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(String);

impl Digest {
    /// Hashes a byte slice.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Reads a file and hashes its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn of_file(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Returns the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid cache entry: {0}")]
    Serde(#[from] serde_json::Error),
}

/// On-disk result cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Creates a cache handle. Nothing is touched on disk until a write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, tool: &str, digest: &Digest) -> PathBuf {
        self.root
            .join(sanitize(tool))
            .join(format!("{}.json", digest.as_str()))
    }

    /// Looks up the stored result for `tool` and `digest`.
    ///
    /// Missing, unreadable and corrupt entries all return `None`.
    pub async fn get(&self, tool: &str, digest: &Digest) -> Option<FileResult> {
        let path = self.entry_path(tool, digest);
        match read_entry(&path).await {
            Ok(result) => Some(result),
            Err(CacheError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!("Ignoring cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Stores a result for `tool` and `digest`, creating directories as needed.
    ///
    /// Failures are logged and otherwise ignored. The fixed count is not
    /// stored since it only describes the run that produced it.
    pub async fn put(&self, tool: &str, digest: &Digest, result: &FileResult) {
        let path = self.entry_path(tool, digest);
        if let Err(e) = write_entry(&path, result).await {
            warn!("Failed to write cache entry {}: {}", path.display(), e);
        }
    }

    /// Removes the whole cache directory. A missing directory is not an error.
    pub async fn clear(&self) {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!("Cleared cache at {}", self.root.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear cache {}: {}", self.root.display(), e),
        }
    }
}

async fn read_entry(path: &Path) -> Result<FileResult, CacheError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn write_entry(path: &Path, result: &FileResult) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut stored = result.clone();
    stored.fixed = None;
    let bytes = serde_json::to_vec(&stored)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Keeps tool names usable as a single directory component.
fn sanitize(tool: &str) -> String {
    let name: String = tool
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.as_str() {
        "" | "." | ".." => format!("_{name}"),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, Severity};
    use tempfile::TempDir;

    fn sample() -> FileResult {
        FileResult::new(
            "/src/a.py",
            "python",
            vec![Issue::new(10, 5, "E302", "expected 2 blank lines, found 1", Severity::Error)],
        )
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = Digest::of_bytes(b"print('hi')\n");
        let b = Digest::of_bytes(b"print('hi')\n");
        let c = Digest::of_bytes(b"print('hi') \n");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[tokio::test]
    async fn test_digest_ignores_path() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("one.py");
        let second = tmp.path().join("nested_two.py");
        std::fs::write(&first, "x = 1\n").unwrap();
        std::fs::write(&second, "x = 1\n").unwrap();

        let a = Digest::of_file(&first).await.unwrap();
        let b = Digest::of_file(&second).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Digest::of_file(&first).await.unwrap());

        std::fs::write(&second, "x = 2\n").unwrap();
        assert_ne!(a, Digest::of_file(&second).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path().join("cache"));
        let digest = Digest::of_bytes(b"content");

        assert!(cache.get("flake8", &digest).await.is_none());
        cache.put("flake8", &digest, &sample()).await;
        assert_eq!(cache.get("flake8", &digest).await, Some(sample()));
        assert!(cache.get("eslint", &digest).await.is_none());
        assert!(tmp
            .path()
            .join("cache/flake8")
            .join(format!("{digest}.json"))
            .exists());
    }

    #[tokio::test]
    async fn test_put_drops_fixed_count() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path());
        let digest = Digest::of_bytes(b"content");

        cache.put("eslint", &digest, &sample().with_fixed(3)).await;
        let stored = cache.get("eslint", &digest).await.unwrap();
        assert_eq!(stored.fixed, None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path());
        let digest = Digest::of_bytes(b"content");

        let dir = tmp.path().join("flake8");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{digest}.json")), "{ not json").unwrap();

        assert!(cache.get("flake8", &digest).await.is_none());
    }

    #[tokio::test]
    async fn test_put_into_unwritable_root_is_silent() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let cache = Cache::new(&blocker);
        let digest = Digest::of_bytes(b"content");
        cache.put("flake8", &digest, &sample()).await;
        assert!(cache.get("flake8", &digest).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_root() {
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path().join("cache"));
        let digest = Digest::of_bytes(b"content");
        cache.put("flake8", &digest, &sample()).await;

        cache.clear().await;
        assert!(!cache.root().exists());
        assert!(cache.get("flake8", &digest).await.is_none());

        // Clearing a missing root is a no-op.
        cache.clear().await;
    }

    #[test]
    fn test_sanitize_tool_names() {
        assert_eq!(sanitize("eslint"), "eslint");
        assert_eq!(sanitize("my/plugin tool"), "my_plugin_tool");
        assert_eq!(sanitize(".."), "_..");
    }
}
