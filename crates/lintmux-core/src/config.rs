//! Configuration types for lintmux.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default worker pool width.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Top-level configuration for lintmux.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of tool invocations that may run at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-invocation timeout in seconds. No timeout when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Glob patterns excluded from file discovery.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Per-language settings, keyed by language tag.
    #[serde(default = "default_languages")]
    pub languages: BTreeMap<String, LanguageConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: None,
            ignore: default_ignore(),
            cache: CacheConfig::default(),
            languages: default_languages(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns the language config if the language is present and enabled.
    #[must_use]
    pub fn language(&self, language: &str) -> Option<&LanguageConfig> {
        self.languages.get(language).filter(|l| l.enabled)
    }

    /// Iterates over enabled languages in name order.
    pub fn enabled_languages(&self) -> impl Iterator<Item = (&str, &LanguageConfig)> {
        self.languages
            .iter()
            .filter(|(_, l)| l.enabled)
            .map(|(name, l)| (name.as_str(), l))
    }

    /// Checks if a tool is enabled for a language.
    ///
    /// Tools without an explicit entry are enabled as long as the language is.
    #[must_use]
    pub fn is_tool_enabled(&self, language: &str, tool: &str) -> bool {
        self.language(language)
            .is_some_and(|l| l.tools.get(tool).map_or(true, |t| t.enabled))
    }

    /// Gets the tool configuration for a language, if any.
    #[must_use]
    pub fn tool(&self, language: &str, tool: &str) -> Option<&ToolConfig> {
        self.languages.get(language).and_then(|l| l.tools.get(tool))
    }

    /// Returns the effective worker pool width (at least 1).
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Lists extensions claimed by more than one enabled language.
    ///
    /// Each entry is `(extension, first_language, second_language)`, where
    /// the first language is the one classification will pick.
    #[must_use]
    pub fn extension_overlaps(&self) -> Vec<(String, String, String)> {
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();
        let mut overlaps = Vec::new();
        for (name, lang) in self.enabled_languages() {
            for ext in &lang.extensions {
                let key = ext.to_ascii_lowercase();
                match owners.get(&key) {
                    Some(first) if *first != name => {
                        overlaps.push((key.clone(), (*first).to_string(), name.to_string()));
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(key, name);
                    }
                }
            }
        }
        overlaps
    }
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_ignore() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/.venv/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_languages() -> BTreeMap<String, LanguageConfig> {
    let table: &[(&str, &[&str])] = &[
        ("python", &[".py", ".pyi"]),
        (
            "javascript",
            &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts"],
        ),
        ("shell", &[".sh", ".bash", ".ksh"]),
        ("yaml", &[".yaml", ".yml"]),
        ("markdown", &[".md", ".markdown"]),
        ("dockerfile", &[".dockerfile"]),
        ("makefile", &[".mk", ".make"]),
    ];

    table
        .iter()
        .map(|(name, exts)| {
            (
                (*name).to_string(),
                LanguageConfig {
                    enabled: true,
                    extensions: exts.iter().map(|e| (*e).to_string()).collect(),
                    tools: BTreeMap::new(),
                },
            )
        })
        .collect()
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether cached results are used and written.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache root directory, relative to the working directory if not absolute.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".lintmux-cache")
}

/// Per-language configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Whether files of this language are linted.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Extensions (with leading dot) or exact file names claimed by this language.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Per-tool settings, keyed by tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

/// Per-tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Whether this tool runs.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Custom command path; the basename must still be allowlisted.
    #[serde(default)]
    pub command: Option<String>,

    /// Tool-specific configuration file passed to the tool.
    #[serde(default)]
    pub config: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            config: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
