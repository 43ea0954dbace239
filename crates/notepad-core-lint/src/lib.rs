#![warn(missing_docs)]
//! `notepad-core-lint` - external linter integration for `notepad-core`.
//!
//! # Overview
//!
//! External linters are black boxes: a command that takes a file path and prints
//! findings. This crate owns everything between that contract and the editor:
//!
//! - [`LinterRegistry`] - the configuration table, keyed by language, with built-in
//!   pylint and flake8 profiles and room for host-registered ones
//! - [`LintRunner`] - worker-thread execution with a hard timeout and forced kill;
//!   results arrive through a polled channel and stale generations are discarded
//! - [`LintReport`] / [`Severity`] - the parsed finding model
//! - [`gutter`] - per-line aggregation (worst severity wins), tooltips, and counts
//!
//! Nothing here blocks the UI thread, and nothing here is a user-facing error: a missing
//! tool, a timeout, a crash, or unparseable output all degrade to "zero results", logged
//! for diagnostics.

mod config;
pub mod gutter;
mod report;
mod runner;

pub use config::{LintConfigError, LinterConfig, LinterRegistry, OutputFormat};
pub use gutter::SeverityCounts;
pub use report::{LintReport, Severity};
pub use runner::{LINT_TIMEOUT, LintRunner};
