//! # lintmux-tools
//!
//! Built-in tools and output parsers for lintmux.
//!
//! ## Available Tools
//!
//! | Tool | Language | Output dialect | Fix |
//! |------|----------|----------------|-----|
//! | `flake8` | python | positional `path:line:col: CODE msg` | no |
//! | `eslint` | javascript | JSON `filePath`/`messages[]` | yes |
//! | `shellcheck` | shell | JSON flat findings | no |
//! | `yamllint` | yaml | `path:line:col: [LEVEL] msg (rule)` | no |
//! | `markdownlint` | markdown | `path:line MDxxx/alias msg` | yes |
//! | `hadolint` | dockerfile | JSON flat findings | no |
//! | `checkmake` | makefile | positional (via `--format` template) | no |
//!
//! ## Usage
//!
//! ```ignore
//! use lintmux_core::Scheduler;
//! use lintmux_tools::builtin_registry;
//!
//! let scheduler = Scheduler::builder()
//!     .registry(builtin_registry())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod command;
pub mod parsers;

pub use builtin::{
    builtin_registry, builtin_tools, checkmake, eslint, flake8, hadolint, markdownlint, shellcheck,
    yamllint,
};
pub use command::{CommandTool, Dialect, OutputStream};

/// Re-export core types for convenience.
pub use lintmux_core::{FileResult, Issue, Severity, ToolRunner};
