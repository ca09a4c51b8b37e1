//! # lintmux-core
//!
//! Core engine for running many external linters over a mixed codebase.
//!
//! This crate provides:
//!
//! - [`Cache`] for content-addressed storage of per-file results
//! - [`classify`] and [`group`] for mapping files to language tags
//! - [`Executor`] for allowlisted, shell-free process execution
//! - [`ToolRunner`] and [`ToolRegistry`] for describing runnable tools
//! - [`Scheduler`] for running (tool × batch) tasks on a worker pool and
//!   aggregating a [`LintReport`]
//!
//! ## Example
//!
//! ```ignore
//! use lintmux_core::{Config, Scheduler};
//!
//! let scheduler = Scheduler::builder()
//!     .config(Config::default())
//!     .registry(lintmux_tools::builtin_registry())
//!     .build()?;
//!
//! let report = scheduler.run(&files).await;
//! println!("{} error(s)", report.summary.errors);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod cache;
mod classify;
mod config;
mod exec;
mod pool;
mod registry;
mod scheduler;
mod tool;
mod types;

pub use aggregate::aggregate;
pub use cache::{Cache, Digest};
pub use classify::{classify, group, DOCKERFILE, MAKEFILE};
pub use config::{CacheConfig, Config, ConfigError, LanguageConfig, ToolConfig, DEFAULT_CONCURRENCY};
pub use exec::{validate, ExecError, ExecOutput, Executor, ALLOWED_COMMANDS};
pub use pool::run_pool;
pub use registry::{ToolBox, ToolRegistry};
pub use scheduler::{
    Scheduler, SchedulerBuilder, SchedulerError, RULE_INTERNAL_ERROR, RULE_NOT_INSTALLED,
    RULE_POLICY_VIOLATION,
};
pub use tool::{Invocation, ToolDescriptor, ToolError, ToolRunner};
pub use types::{FileResult, Issue, LintReport, RunSummary, Severity};
