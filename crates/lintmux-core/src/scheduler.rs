//! Task scheduling: builds (tool × batch) tasks, runs them on the worker
//! pool and aggregates the outcome into a [`LintReport`].

use crate::aggregate::aggregate;
use crate::cache::{Cache, Digest};
use crate::classify;
use crate::config::Config;
use crate::exec::{self, Executor};
use crate::pool::run_pool;
use crate::registry::{ToolBox, ToolRegistry};
use crate::tool::Invocation;
use crate::types::{FileResult, Issue, LintReport, RunSummary, Severity};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rule id of the issue attached when a tool is missing.
pub const RULE_NOT_INSTALLED: &str = "tool-not-installed";

/// Rule id of the issue attached when a tool invocation fails.
pub const RULE_INTERNAL_ERROR: &str = "internal-error";

/// Rule id of the issue attached when a command is not allowlisted.
pub const RULE_POLICY_VIOLATION: &str = "policy-violation";

/// Errors that can occur while setting up a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The working directory could not be determined.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring a [`Scheduler`].
#[derive(Default)]
pub struct SchedulerBuilder {
    config: Option<Config>,
    registry: Option<Arc<ToolRegistry>>,
    root: Option<PathBuf>,
    fix: bool,
    no_cache: bool,
    concurrency: Option<usize>,
}

impl SchedulerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the tool registry.
    #[must_use]
    pub fn registry(mut self, registry: impl Into<Arc<ToolRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Sets the working directory tools run in (default: current directory).
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Enables fix mode. Fix mode never uses the cache.
    #[must_use]
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Disables the cache for this run regardless of configuration.
    #[must_use]
    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Overrides the configured worker pool width.
    #[must_use]
    pub fn concurrency(mut self, width: usize) -> Self {
        self.concurrency = Some(width);
        self
    }

    /// Builds the scheduler.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is given and the current directory
    /// cannot be read.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let config = self.config.unwrap_or_default();

        let root = match self.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => std::env::current_dir()?.join(root),
            None => std::env::current_dir()?,
        };

        let cache = (config.cache.enabled && !self.no_cache && !self.fix).then(|| {
            let dir = &config.cache.dir;
            Cache::new(if dir.is_absolute() {
                dir.clone()
            } else {
                root.join(dir)
            })
        });

        let executor =
            Executor::new().with_timeout(config.timeout_secs.map(Duration::from_secs));

        Ok(Scheduler {
            concurrency: self.concurrency.unwrap_or_else(|| config.concurrency()).max(1),
            config,
            registry: self.registry.unwrap_or_default(),
            env: Arc::new(TaskEnv {
                root,
                fix: self.fix,
                cache,
                executor,
            }),
        })
    }
}

/// Orchestrates a lint run over a set of files.
///
/// Use [`Scheduler::builder()`] to construct an instance.
pub struct Scheduler {
    config: Config,
    registry: Arc<ToolRegistry>,
    concurrency: usize,
    env: Arc<TaskEnv>,
}

/// Settings shared by every task of a run.
#[derive(Debug)]
struct TaskEnv {
    root: PathBuf,
    fix: bool,
    cache: Option<Cache>,
    executor: Executor,
}

/// One tool over one language batch.
#[derive(Clone)]
struct Task {
    tool: ToolBox,
    language: String,
    files: Vec<PathBuf>,
    command: String,
    config: Option<PathBuf>,
}

impl Task {
    fn name(&self) -> &str {
        &self.tool.descriptor().name
    }
}

impl Scheduler {
    /// Creates a new builder for configuring a scheduler.
    #[must_use]
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    /// Returns the working directory tools run in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.env.root
    }

    /// Returns the worker pool width.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns true if this run reads and writes the cache.
    #[must_use]
    pub fn caching(&self) -> bool {
        self.env.cache.is_some()
    }

    /// Lints `files` and returns one merged result per touched file.
    ///
    /// Never fails: every tool-level problem is reported as issues on the
    /// affected files.
    pub async fn run(&self, files: &[PathBuf]) -> LintReport {
        let start = Instant::now();
        info!("Starting run over {} file(s)", files.len());

        for (ext, first, second) in self.config.extension_overlaps() {
            warn!(
                "Extension {} is claimed by both {} and {}; using {}",
                ext, first, second, first
            );
        }

        let tasks = self.build_tasks(files);
        info!(
            "Scheduled {} task(s) on {} worker(s)",
            tasks.len(),
            self.concurrency
        );

        let fallbacks = tasks.clone();
        let env = Arc::clone(&self.env);
        let outcomes = run_pool(tasks, self.concurrency, move |task| {
            let env = Arc::clone(&env);
            async move { env.run_task(&task).await }
        })
        .await;

        let partials = outcomes
            .into_iter()
            .zip(fallbacks)
            .flat_map(|(outcome, task)| {
                outcome.unwrap_or_else(|| {
                    synthetic(&task, RULE_INTERNAL_ERROR, Severity::Error, |name| {
                        format!("{name} failed: task aborted unexpectedly")
                    })
                })
            });

        let results = aggregate(partials);
        let summary = RunSummary::from_results(&results, self.env.fix, start.elapsed());

        info!(
            "Run complete: {} error(s), {} warning(s) in {} file(s)",
            summary.errors, summary.warnings, summary.files
        );

        LintReport { results, summary }
    }

    /// Builds one task per enabled (language, tool) pair with a non-empty batch.
    fn build_tasks(&self, files: &[PathBuf]) -> Vec<Task> {
        let mut tasks = Vec::new();

        for (language, batch) in classify::group(files, &self.config) {
            for tool in self.registry.for_language(&language) {
                let name = &tool.descriptor().name;
                if !self.config.is_tool_enabled(&language, name) {
                    debug!("Skipping disabled tool: {}", name);
                    continue;
                }

                let tool_config = self.config.tool(&language, name);
                let command = tool_config
                    .and_then(|t| t.command.clone())
                    .unwrap_or_else(|| tool.descriptor().command.clone());
                let config = tool_config.and_then(|t| t.config.clone()).map(|p| {
                    if p.is_absolute() {
                        p
                    } else {
                        self.env.root.join(p)
                    }
                });

                tasks.push(Task {
                    tool: Arc::clone(tool),
                    language: language.clone(),
                    files: batch.clone(),
                    command,
                    config,
                });
            }
        }

        tasks
    }
}

impl TaskEnv {
    async fn run_task(&self, task: &Task) -> Vec<FileResult> {
        let descriptor = task.tool.descriptor();

        if let Err(e) = exec::validate(&task.command) {
            warn!("{}: {}", task.name(), e);
            return synthetic(task, RULE_POLICY_VIOLATION, Severity::Error, |name| {
                format!("{name} was not run: {e}")
            });
        }

        if !task.tool.is_available(&task.command, &self.executor).await {
            warn!("{} is not installed, skipping {} file(s)", task.name(), task.files.len());
            return synthetic(task, RULE_NOT_INSTALLED, Severity::Warning, |name| {
                if descriptor.install_hint.is_empty() {
                    format!("{name} is not installed")
                } else {
                    format!("{name} is not installed ({})", descriptor.install_hint)
                }
            });
        }

        let (mut results, misses) = self.lookup(task).await;
        if misses.is_empty() {
            debug!("{}: all {} file(s) served from cache", task.name(), results.len());
            return results;
        }

        let miss_files: Vec<PathBuf> = misses.iter().map(|(f, _)| f.clone()).collect();
        let invocation = Invocation {
            files: &miss_files,
            language: &task.language,
            cwd: &self.root,
            command: &task.command,
            config: task.config.as_deref(),
            executor: &self.executor,
        };

        let outcome = if self.fix && descriptor.can_fix {
            task.tool.fix(&invocation).await
        } else {
            task.tool.check(&invocation).await
        };

        match outcome {
            Ok(fresh) => {
                let fresh = self.complete_batch(fresh, &miss_files, &task.language);
                if let Some(cache) = &self.cache {
                    let digests: HashMap<&Path, &Digest> = misses
                        .iter()
                        .filter_map(|(f, d)| d.as_ref().map(|d| (f.as_path(), d)))
                        .collect();
                    for result in &fresh {
                        if let Some(digest) = digests.get(result.path.as_path()) {
                            cache.put(task.name(), digest, result).await;
                        }
                    }
                }
                results.extend(fresh);
            }
            Err(e) => {
                warn!("{} failed: {}", task.name(), e);
                results.extend(miss_files.iter().map(|file| {
                    FileResult::new(
                        file,
                        &task.language,
                        vec![Issue::new(
                            1,
                            1,
                            RULE_INTERNAL_ERROR,
                            format!("{} failed: {e}", task.name()),
                            Severity::Error,
                        )],
                    )
                }));
            }
        }

        results
    }

    /// Splits a batch into cache hits and misses.
    ///
    /// Misses carry their digest when it could be computed, so fresh results
    /// can be written back.
    async fn lookup(&self, task: &Task) -> (Vec<FileResult>, Vec<(PathBuf, Option<Digest>)>) {
        let Some(cache) = &self.cache else {
            return (
                Vec::new(),
                task.files.iter().map(|f| (f.clone(), None)).collect(),
            );
        };

        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for file in &task.files {
            let digest = match Digest::of_file(&self.resolve(file)).await {
                Ok(digest) => digest,
                Err(e) => {
                    debug!("Cannot hash {}: {}", file.display(), e);
                    misses.push((file.clone(), None));
                    continue;
                }
            };
            match cache.get(task.name(), &digest).await {
                Some(mut hit) => {
                    debug!("Cache hit for {} ({})", file.display(), task.name());
                    hit.path = file.clone();
                    hit.language = task.language.clone();
                    hits.push(hit);
                }
                None => misses.push((file.clone(), Some(digest))),
            }
        }
        (hits, misses)
    }

    /// Anchors tool-reported paths to the batch and adds clean results for
    /// files the tool said nothing about.
    fn complete_batch(
        &self,
        fresh: Vec<FileResult>,
        batch: &[PathBuf],
        language: &str,
    ) -> Vec<FileResult> {
        let by_resolved: HashMap<PathBuf, &PathBuf> =
            batch.iter().map(|f| (self.resolve(f), f)).collect();

        let mut seen = vec![false; batch.len()];
        let positions: HashMap<&PathBuf, usize> =
            batch.iter().enumerate().map(|(i, f)| (f, i)).collect();

        let mut results: Vec<FileResult> = Vec::with_capacity(batch.len());
        for mut result in fresh {
            let resolved = self.resolve(&result.path);
            if let Some(original) = by_resolved.get(&resolved) {
                result.path = (*original).clone();
                if let Some(&i) = positions.get(original) {
                    seen[i] = true;
                }
            } else {
                result.path = resolved;
            }
            results.push(result);
        }

        for (file, seen) in batch.iter().zip(seen) {
            if !seen {
                results.push(FileResult::clean(file, language));
            }
        }

        aggregate(results)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// One synthetic issue per file in the task's batch.
fn synthetic(
    task: &Task,
    rule: &str,
    severity: Severity,
    message: impl Fn(&str) -> String,
) -> Vec<FileResult> {
    let text = message(task.name());
    task.files
        .iter()
        .map(|file| {
            FileResult::new(
                file,
                &task.language,
                vec![Issue::new(1, 1, rule, text.clone(), severity)],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let scheduler = Scheduler::builder()
            .root(".")
            .build()
            .expect("Failed to build scheduler");

        assert!(scheduler.root().is_absolute());
        assert_eq!(scheduler.concurrency(), 4);
        assert!(scheduler.caching());
    }

    #[test]
    fn test_fix_mode_disables_cache() {
        let scheduler = Scheduler::builder().root(".").fix(true).build().unwrap();
        assert!(!scheduler.caching());
    }

    #[test]
    fn test_no_cache_and_config_disable_cache() {
        let scheduler = Scheduler::builder().root(".").no_cache(true).build().unwrap();
        assert!(!scheduler.caching());

        let config = Config::parse("[cache]\nenabled = false").unwrap();
        let scheduler = Scheduler::builder().root(".").config(config).build().unwrap();
        assert!(!scheduler.caching());
    }

    #[test]
    fn test_concurrency_override_is_clamped() {
        let scheduler = Scheduler::builder().root(".").concurrency(0).build().unwrap();
        assert_eq!(scheduler.concurrency(), 1);
    }
}
