//! Locating the lintmux configuration.
//!
//! The first hit wins:
//!
//! 1. an explicit path from `--config` or `$LINTMUX_CONFIG` (a directory
//!    means the `lintmux.toml` inside it)
//! 2. `lintmux.toml`, then `.lintmux.toml`, in the project directory
//! 3. `config.toml` in the user directory (`$LINTMUX_CONFIG_DIR`, else
//!    `~/.lintmux`)
//!
//! With none of those the built-in defaults apply.

use anyhow::{Context, Result};
use lintmux_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["lintmux.toml", ".lintmux.toml"];

const USER_CONFIG_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in `$LINTMUX_CONFIG`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the user config directory.
    User(PathBuf),
    /// Nothing found; [`Config::default`] is used.
    Builtin,
}

impl ConfigSource {
    /// Returns the config file path, if there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::User(p) => Some(p),
            Self::Builtin => None,
        }
    }

    /// Reads and parses the config file, or returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        tracing::debug!("Configuration: {self}");
        match self.path() {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display())),
            None => Ok(Config::default()),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (explicit)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::User(p) => write!(f, "{} (user)", p.display()),
            Self::Builtin => f.write_str("built-in defaults"),
        }
    }
}

/// Directories searched for a config file.
///
/// Kept separate from the process environment so lookups can be tested
/// without touching env vars.
#[derive(Debug, Clone)]
pub struct SearchPaths {
    project_dir: PathBuf,
    user_dir: Option<PathBuf>,
}

impl SearchPaths {
    /// Project directory plus the user directory taken from the environment.
    #[must_use]
    pub fn from_env(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            user_dir: user_config_dir(),
        }
    }

    /// Finds the configuration, preferring `explicit` when given.
    ///
    /// A relative explicit path is taken relative to the project directory.
    #[must_use]
    pub fn locate(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            let path = self.project_dir.join(path);
            return if path.is_dir() {
                ConfigSource::Explicit(path.join(PROJECT_CONFIG_NAMES[0]))
            } else {
                ConfigSource::Explicit(path)
            };
        }

        if let Some(found) = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|p| p.is_file())
        {
            return ConfigSource::Project(found);
        }

        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_NAME))
            .filter(|p| p.is_file())
            .map_or(ConfigSource::Builtin, ConfigSource::User)
    }
}

/// Finds the configuration for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    SearchPaths::from_env(project_dir).locate(explicit)
}

/// `$LINTMUX_CONFIG_DIR`, else `~/.lintmux`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os("LINTMUX_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home::home_dir().map(|h| h.join(".lintmux")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn search(project: &Path, user: Option<&Path>) -> SearchPaths {
        SearchPaths {
            project_dir: project.to_path_buf(),
            user_dir: user.map(Path::to_path_buf),
        }
    }

    #[test]
    fn explicit_wins_over_project_file() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();
        fs::write(tmp.path().join("lintmux.toml"), "").unwrap();

        let source = search(tmp.path(), None).locate(Some(&explicit));
        assert_eq!(source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn relative_explicit_path_is_joined_to_project() {
        let tmp = TempDir::new().unwrap();
        let source = search(tmp.path(), None).locate(Some(Path::new("ci/lint.toml")));
        assert_eq!(source, ConfigSource::Explicit(tmp.path().join("ci/lint.toml")));
    }

    #[test]
    fn explicit_directory_means_its_lintmux_toml() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("ci")).unwrap();
        let source = search(tmp.path(), None).locate(Some(Path::new("ci")));
        assert_eq!(source, ConfigSource::Explicit(tmp.path().join("ci/lintmux.toml")));
    }

    #[test]
    fn project_names_are_checked_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".lintmux.toml"), "").unwrap();
        let source = search(tmp.path(), None).locate(None);
        assert_eq!(source, ConfigSource::Project(tmp.path().join(".lintmux.toml")));

        fs::write(tmp.path().join("lintmux.toml"), "").unwrap();
        let source = search(tmp.path(), None).locate(None);
        assert_eq!(source, ConfigSource::Project(tmp.path().join("lintmux.toml")));
    }

    #[test]
    fn user_config_only_without_project_file() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::write(user.path().join("config.toml"), "").unwrap();

        let source = search(project.path(), Some(user.path())).locate(None);
        assert_eq!(source, ConfigSource::User(user.path().join("config.toml")));

        fs::write(project.path().join("lintmux.toml"), "").unwrap();
        let source = search(project.path(), Some(user.path())).locate(None);
        assert!(matches!(source, ConfigSource::Project(_)));
    }

    #[test]
    fn nothing_found_falls_back_to_builtin() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let source = search(project.path(), Some(user.path())).locate(None);
        assert_eq!(source, ConfigSource::Builtin);
        assert!(source.path().is_none());
        assert_eq!(source.to_string(), "built-in defaults");
    }

    #[test]
    fn load_reads_the_located_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lintmux.toml");
        fs::write(&path, "concurrency = 9\n").unwrap();

        let config = ConfigSource::Project(path).load().unwrap();
        assert_eq!(config.concurrency, 9);
        assert_eq!(ConfigSource::Builtin.load().unwrap().concurrency, 4);
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let err = ConfigSource::Explicit(PathBuf::from("/nonexistent/lintmux.toml"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
