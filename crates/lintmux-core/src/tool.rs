//! Tool traits for wrapping external linters.

use crate::exec::{ExecError, Executor};
use crate::types::FileResult;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Static metadata describing one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    /// Unique tool name (e.g., "eslint"), also the cache namespace.
    pub name: String,
    /// Language tag this tool lints.
    pub language: String,
    /// Brief description of what the tool checks.
    pub description: String,
    /// Binary to run unless the configuration overrides it.
    pub command: String,
    /// Config file names the tool picks up on its own.
    pub config_files: Vec<String>,
    /// Whether the tool can rewrite files to fix issues.
    pub can_fix: bool,
    /// How to install the tool, shown when it is missing.
    pub install_hint: String,
}

impl ToolDescriptor {
    /// Creates a descriptor for a check-only tool.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            description: String::new(),
            command: command.into(),
            config_files: Vec::new(),
            can_fix: false,
            install_hint: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the config file names.
    #[must_use]
    pub fn config_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the tool as able to fix files.
    #[must_use]
    pub fn can_fix(mut self, can_fix: bool) -> Self {
        self.can_fix = can_fix;
        self
    }

    /// Sets the install hint.
    #[must_use]
    pub fn install_hint(mut self, hint: impl Into<String>) -> Self {
        self.install_hint = hint.into();
        self
    }
}

/// Everything a runner needs for one invocation over a batch of files.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Files to lint, as given by discovery.
    pub files: &'a [PathBuf],
    /// Language tag of the batch.
    pub language: &'a str,
    /// Working directory for the child process.
    pub cwd: &'a Path,
    /// Command to run (configured override or the descriptor's default).
    pub command: &'a str,
    /// Tool config file from the lintmux configuration, if any.
    pub config: Option<&'a Path>,
    /// Executor enforcing the allowlist and timeout.
    pub executor: &'a Executor,
}

/// Errors from running a tool over a batch.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The command was rejected or did not finish.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The tool ran but its result could not be used.
    #[error("{tool} failed: {message}")]
    Failed {
        /// Tool name.
        tool: String,
        /// What went wrong.
        message: String,
    },
}

/// A runnable external tool.
///
/// Built-ins and plugin tools implement this trait and are registered in a
/// [`ToolRegistry`](crate::ToolRegistry); the scheduler treats them alike.
///
/// # Example
///
/// ```ignore
/// use lintmux_core::{FileResult, Invocation, ToolDescriptor, ToolError, ToolRunner};
///
/// struct Noop(ToolDescriptor);
///
/// #[async_trait::async_trait]
/// impl ToolRunner for Noop {
///     fn descriptor(&self) -> &ToolDescriptor { &self.0 }
///
///     async fn check(&self, inv: &Invocation<'_>) -> Result<Vec<FileResult>, ToolError> {
///         Ok(inv.files.iter().map(|f| FileResult::clean(f, inv.language)).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Returns the static descriptor of this tool.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Checks whether the tool can be run at all.
    ///
    /// The default probes the search path for `command`.
    async fn is_available(&self, command: &str, executor: &Executor) -> bool {
        executor.command_exists(command).await
    }

    /// Lints the batch without modifying files.
    async fn check(&self, inv: &Invocation<'_>) -> Result<Vec<FileResult>, ToolError>;

    /// Fixes the batch in place and reports what remains.
    ///
    /// Only called when the descriptor says the tool can fix. The default
    /// falls back to [`check`](Self::check).
    async fn fix(&self, inv: &Invocation<'_>) -> Result<Vec<FileResult>, ToolError> {
        self.check(inv).await
    }
}
