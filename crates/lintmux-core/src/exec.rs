//! Allowlisted, shell-free execution of external tools.
//!
//! Every command is checked against [`ALLOWED_COMMANDS`] before anything is
//! spawned. Arguments are passed as a list and never go through a shell.
//! A non-zero exit status is a normal outcome here, since most linters use
//! it to signal findings.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Binaries lintmux is allowed to spawn, matched on basename.
pub const ALLOWED_COMMANDS: &[&str] = &[
    "eslint",
    "prettier",
    "flake8",
    "pycodestyle",
    "black",
    "shellcheck",
    "shfmt",
    "yamllint",
    "markdownlint",
    "hadolint",
    "checkmake",
    // path probes
    "which",
    "where",
];

/// Errors raised before or while running an external command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The command's basename is not on the allowlist.
    #[error("command `{command}` is not allowed to run")]
    PolicyViolation {
        /// Command as it was requested.
        command: String,
    },

    /// The command did not finish within the configured timeout.
    #[error("command `{command}` timed out after {}s", after.as_secs())]
    TimedOut {
        /// Command that was killed.
        command: String,
        /// Configured limit.
        after: Duration,
    },
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code; `1` when the process could not be spawned or was killed by a signal.
    pub exit_code: i32,
}

impl ExecOutput {
    fn spawn_failure(command: &str, err: &std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("failed to run {command}: {err}"),
            exit_code: 1,
        }
    }

    /// Returns true if the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Strips any directory prefix (and a trailing `.exe`) from a command.
fn basename(command: &str) -> &str {
    let name = command
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(command);
    match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".exe") => {
            &name[..cut]
        }
        _ => name,
    }
}

/// Checks a command against the allowlist.
///
/// Only the basename is compared, so `/usr/local/bin/eslint` passes while
/// `/usr/bin/curl` and `rm` do not.
///
/// # Errors
///
/// Returns [`ExecError::PolicyViolation`] if the basename is not allowlisted.
pub fn validate(command: &str) -> Result<(), ExecError> {
    let name = basename(command);
    if !name.is_empty() && ALLOWED_COMMANDS.contains(&name) {
        Ok(())
    } else {
        Err(ExecError::PolicyViolation {
            command: command.to_string(),
        })
    }
}

/// Runs allowlisted commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    timeout: Option<Duration>,
}

impl Executor {
    /// Creates an executor without a timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-invocation timeout. `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validates and runs `command` with `args` in `cwd`, capturing its output.
    ///
    /// A spawn failure (missing binary, permissions) is not an error: it
    /// yields empty stdout, the error text on stderr and exit code 1.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::PolicyViolation`] without spawning anything if the
    /// command is not allowlisted, and [`ExecError::TimedOut`] if a timeout is
    /// configured and exceeded (the child is killed).
    pub async fn execute<S: AsRef<OsStr>>(
        &self,
        command: &str,
        args: &[S],
        cwd: &Path,
    ) -> Result<ExecOutput, ExecError> {
        validate(command)?;
        debug!("Running {} with {} argument(s)", command, args.len());

        let child = Command::new(command)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", command, e);
                return Ok(ExecOutput::spawn_failure(command, &e));
            }
        };

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExecError::TimedOut {
                    command: command.to_string(),
                    after: limit,
                })?,
            None => child.wait_with_output().await,
        };

        match waited {
            Ok(output) => Ok(ExecOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(1),
            }),
            Err(e) => {
                warn!("Failed to collect output of {}: {}", command, e);
                Ok(ExecOutput::spawn_failure(command, &e))
            }
        }
    }

    /// Checks whether `command` resolves on the search path.
    ///
    /// Uses the platform probe utility (`which`, or `where` on Windows).
    /// Commands outside the allowlist are reported as unavailable.
    pub async fn command_exists(&self, command: &str) -> bool {
        if validate(command).is_err() {
            return false;
        }
        let probe = if cfg!(windows) { "where" } else { "which" };
        match self.execute(probe, &[command], Path::new(".")).await {
            Ok(output) => output.success(),
            Err(e) => {
                debug!("Probe for {} failed: {}", command, e);
                false
            }
        }
    }
}
