//! Metapush: push content into metadata templates
//!
//! Merges field descriptions (from CSV, JSON, YAML or TOML content sources)
//! into a metadata template, optionally checks table and field names against a
//! data directory, and writes the merged document.

pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod logging;
pub mod merge;
pub mod model;
pub mod output;
pub mod tooling;
pub mod validate;

pub use error::{MetapushError, Mismatch, MismatchKind, MismatchSource};
pub use merge::{merge, MergeOptions, MergeOutcome};
pub use model::{Attributes, Content, Field, MergedDocument, Table, Template};
pub use output::{write, WriteOptions};
pub use validate::validate_against_data;
