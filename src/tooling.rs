//! Tooling & Integration Layer
//!
//! The command-line surface and the run summary it prints.

pub mod cli;
pub mod report;

pub use cli::{Cli, CliContext, MergeArgs};
pub use report::{format_report, DataCheck, RunReport};
