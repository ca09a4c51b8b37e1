//! Subcommand implementations.

pub mod check;
pub mod clean_cache;
pub mod init;
pub mod list_tools;
pub mod output;
