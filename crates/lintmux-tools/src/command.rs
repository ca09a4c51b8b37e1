//! Generic runner for tools driven purely by command-line arguments.

use crate::parsers;
use async_trait::async_trait;
use lintmux_core::{ExecOutput, FileResult, Invocation, ToolDescriptor, ToolError, ToolRunner};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output format a tool prints its findings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `path:line:col: CODE message` (flake8).
    Positional,
    /// JSON array of `{filePath, messages[]}` (eslint).
    Eslint,
    /// JSON array of flat findings (shellcheck, hadolint).
    Findings,
    /// `path:line:col: [LEVEL] message (rule)` (yamllint).
    Bracketed,
    /// `path:line[:col] MDxxx/alias message` (markdownlint).
    SlashRule,
}

impl Dialect {
    /// Parses raw output in this dialect.
    #[must_use]
    pub fn parse(self, output: &str, language: &str) -> Vec<FileResult> {
        match self {
            Self::Positional => parsers::positional::parse(output, language),
            Self::Eslint => parsers::eslint::parse(output, language),
            Self::Findings => parsers::findings::parse(output, language),
            Self::Bracketed => parsers::bracketed::parse(output, language),
            Self::SlashRule => parsers::slash_rule::parse(output, language),
        }
    }
}

/// Which captured stream holds the findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStream {
    /// Findings are printed on stdout.
    #[default]
    Stdout,
    /// Findings may appear on either stream (markdownlint uses stderr).
    Combined,
}

/// A tool run as `command [args] [config-flag config] files...`.
#[derive(Debug, Clone)]
pub struct CommandTool {
    descriptor: ToolDescriptor,
    dialect: Dialect,
    check_args: Vec<String>,
    fix_args: Vec<String>,
    config_flag: Option<String>,
    stream: OutputStream,
}

impl CommandTool {
    /// Creates a runner for `descriptor` whose output is in `dialect`.
    #[must_use]
    pub fn new(descriptor: ToolDescriptor, dialect: Dialect) -> Self {
        Self {
            descriptor,
            dialect,
            check_args: Vec::new(),
            fix_args: Vec::new(),
            config_flag: None,
            stream: OutputStream::Stdout,
        }
    }

    /// Sets the arguments for a check run.
    #[must_use]
    pub fn check_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the arguments for a fix run.
    #[must_use]
    pub fn fix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fix_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the flag that passes a tool config file (e.g., `--config`).
    #[must_use]
    pub fn config_flag(mut self, flag: impl Into<String>) -> Self {
        self.config_flag = Some(flag.into());
        self
    }

    /// Sets which stream is parsed.
    #[must_use]
    pub fn stream(mut self, stream: OutputStream) -> Self {
        self.stream = stream;
        self
    }

    /// Returns the output dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Builds the full argument list for one invocation.
    fn args(&self, base: &[String], inv: &Invocation<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = base.iter().map(OsString::from).collect();
        if let (Some(flag), Some(config)) = (&self.config_flag, inv.config) {
            args.push(flag.into());
            args.push(config.into());
        }
        args.extend(inv.files.iter().map(OsString::from));
        args
    }

    async fn run(&self, base: &[String], inv: &Invocation<'_>) -> Result<ExecOutput, ToolError> {
        let args = self.args(base, inv);
        Ok(inv.executor.execute(inv.command, &args, inv.cwd).await?)
    }

    fn findings<'a>(&self, output: &'a ExecOutput) -> std::borrow::Cow<'a, str> {
        match self.stream {
            OutputStream::Stdout => output.stdout.as_str().into(),
            OutputStream::Combined => format!("{}\n{}", output.stdout, output.stderr).into(),
        }
    }
}

#[async_trait]
impl ToolRunner for CommandTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn check(&self, inv: &Invocation<'_>) -> Result<Vec<FileResult>, ToolError> {
        let output = self.run(&self.check_args, inv).await?;
        let results = self.dialect.parse(&self.findings(&output), inv.language);

        // Nothing parsed, a failing exit and a complaint on stderr means the
        // tool itself broke (bad config, crash), not that the files are clean.
        if results.is_empty() && !output.success() && !output.stderr.trim().is_empty() {
            let message = output
                .stderr
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or_default()
                .trim()
                .to_string();
            return Err(ToolError::Failed {
                tool: self.descriptor.name.clone(),
                message,
            });
        }

        debug!(
            "{}: {} result(s) from {} file(s)",
            self.descriptor.name,
            results.len(),
            inv.files.len()
        );
        Ok(results)
    }

    /// Runs check, fix, then check again and reports what remains.
    async fn fix(&self, inv: &Invocation<'_>) -> Result<Vec<FileResult>, ToolError> {
        let before = self.check(inv).await?;
        let output = self.run(&self.fix_args, inv).await?;
        if !output.success() {
            debug!(
                "{} --fix exited with {}",
                self.descriptor.name, output.exit_code
            );
        }
        let after = self.check(inv).await?;
        Ok(settle(&before, after, inv.files, inv.cwd, inv.language))
    }
}

/// Attaches per-file fixed counts (`before - after`, floored at zero) to the
/// post-fix results and fills in files that ended up clean.
fn settle(
    before: &[FileResult],
    after: Vec<FileResult>,
    files: &[PathBuf],
    cwd: &Path,
    language: &str,
) -> Vec<FileResult> {
    let resolve = |p: &Path| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            cwd.join(p)
        }
    };

    let mut counts: HashMap<PathBuf, usize> = HashMap::new();
    for result in before {
        *counts.entry(resolve(&result.path)).or_default() += result.issues.len();
    }

    let mut seen = HashSet::new();
    let mut results: Vec<FileResult> = after
        .into_iter()
        .map(|result| {
            let key = resolve(&result.path);
            let fixed = counts
                .get(&key)
                .copied()
                .unwrap_or(0)
                .saturating_sub(result.issues.len());
            seen.insert(key);
            result.with_fixed(fixed)
        })
        .collect();

    for file in files {
        let key = resolve(file);
        let fixed = counts.get(&key).copied().unwrap_or(0);
        if seen.insert(key) {
            results.push(FileResult::clean(file, language).with_fixed(fixed));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintmux_core::{Executor, Issue, Severity};

    fn warnings(path: &str, n: usize) -> FileResult {
        let issues = (0..n)
            .map(|i| Issue::new(i + 1, 1, "MD009", "Trailing spaces", Severity::Warning))
            .collect();
        FileResult::new(path, "markdown", issues)
    }

    fn markdownlint() -> CommandTool {
        CommandTool::new(
            ToolDescriptor::new("markdownlint", "markdown", "markdownlint").can_fix(true),
            Dialect::SlashRule,
        )
        .fix_args(["--fix"])
        .config_flag("--config")
        .stream(OutputStream::Combined)
    }

    #[test]
    fn test_args_order() {
        let tool = markdownlint().check_args(["--quiet"]);
        let files = vec![PathBuf::from("a.md"), PathBuf::from("b.md")];
        let executor = Executor::new();
        let config = PathBuf::from("/repo/.markdownlint.json");
        let mut inv = Invocation {
            files: &files,
            language: "markdown",
            cwd: Path::new("/repo"),
            command: "markdownlint",
            config: Some(config.as_path()),
            executor: &executor,
        };

        let args = tool.args(&tool.check_args, &inv);
        assert_eq!(
            args,
            ["--quiet", "--config", "/repo/.markdownlint.json", "a.md", "b.md"]
                .map(OsString::from)
                .to_vec()
        );

        inv.config = None;
        let args = tool.args(&tool.fix_args, &inv);
        assert_eq!(args, ["--fix", "a.md", "b.md"].map(OsString::from).to_vec());
    }

    #[test]
    fn test_combined_stream_sees_stderr() {
        let output = ExecOutput {
            stdout: String::new(),
            stderr: "a.md:1 MD047/single-trailing-newline Files should end with a single newline character\n".into(),
            exit_code: 1,
        };
        let tool = markdownlint();
        let results = tool.dialect().parse(&tool.findings(&output), "markdown");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_settle_counts_fixed_per_file() {
        let files = vec![PathBuf::from("a.md"), PathBuf::from("b.md"), PathBuf::from("c.md")];
        let before = [warnings("a.md", 3), warnings("/repo/b.md", 2)];
        let after = vec![warnings("a.md", 1)];

        let results = settle(&before, after, &files, Path::new("/repo"), "markdown");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].issues.len(), 1);
        assert_eq!(results[0].fixed, Some(2));
        assert_eq!(results[1].path, PathBuf::from("b.md"));
        assert!(results[1].issues.is_empty());
        assert_eq!(results[1].fixed, Some(2));
        assert_eq!(results[2].fixed, Some(0));
    }

    #[test]
    fn test_settle_never_goes_negative() {
        let files = vec![PathBuf::from("a.md")];
        let results = settle(
            &[warnings("a.md", 1)],
            vec![warnings("a.md", 4)],
            &files,
            Path::new("/repo"),
            "markdown",
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fixed, Some(0));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_failure() {
        let tool = CommandTool::new(
            ToolDescriptor::new("flake8", "python", "flake8"),
            Dialect::Positional,
        );
        let files = vec![PathBuf::from("a.py")];
        let executor = Executor::new();
        let inv = Invocation {
            files: &files,
            language: "python",
            cwd: Path::new("."),
            command: "/nonexistent/lintmux/bin/flake8",
            config: None,
            executor: &executor,
        };

        let err = tool.check(&inv).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed { ref tool, .. } if tool == "flake8"));
    }

    #[tokio::test]
    async fn test_disallowed_command_is_rejected() {
        let tool = CommandTool::new(
            ToolDescriptor::new("flake8", "python", "flake8"),
            Dialect::Positional,
        );
        let files = vec![PathBuf::from("a.py")];
        let executor = Executor::new();
        let inv = Invocation {
            files: &files,
            language: "python",
            cwd: Path::new("."),
            command: "/bin/sh",
            config: None,
            executor: &executor,
        };

        let err = tool.check(&inv).await.unwrap_err();
        assert!(matches!(err, ToolError::Exec(_)));
    }
}
