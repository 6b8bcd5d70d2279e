//! Error types
//!
//! Fatal errors abort a run. Mismatches are recoverable and are collected
//! and reported alongside the merged document.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors for template/content loading, validation and output.
#[derive(Debug, Error)]
pub enum MetapushError {
    #[error("Cannot read input {path}: {reason}")]
    InputRead { path: PathBuf, reason: String },

    #[error("Unsupported document format: {0} (expected .json, .yaml, .yml, .toml or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("Output file '{0}' exists, --overwrite not specified")]
    OutputExists(PathBuf),

    #[error("Data path {path}: {reason}")]
    DataPath { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl MetapushError {
    pub fn input(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        MetapushError::InputRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn data_path(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        MetapushError::DataPath {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Where a mismatch was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchSource {
    /// Content referenced something the template does not define.
    Content,
    /// The data directory disagrees with the merged document.
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    UnknownTable,
    UnknownField,
    MissingFromData,
    MissingFromTemplate,
}

/// A table or field name that one side references and the other lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub source: MismatchSource,
    pub kind: MismatchKind,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Mismatch {
    pub fn content(kind: MismatchKind, table: &str, field: Option<&str>) -> Self {
        Self {
            source: MismatchSource::Content,
            kind,
            table: table.to_string(),
            field: field.map(str::to_string),
        }
    }

    pub fn data(kind: MismatchKind, table: &str, field: Option<&str>) -> Self {
        Self {
            source: MismatchSource::Data,
            kind,
            table: table.to_string(),
            field: field.map(str::to_string),
        }
    }

    /// `table` or `table.field`
    pub fn location(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.table, field),
            None => self.table.clone(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = if self.field.is_some() { "field" } else { "table" };
        match self.kind {
            MismatchKind::UnknownTable => write!(
                f,
                "content references {}, but template has no table '{}'",
                self.location(),
                self.table
            ),
            MismatchKind::UnknownField => write!(
                f,
                "content references {}, which is not a field in the template",
                self.location()
            ),
            MismatchKind::MissingFromData => {
                write!(f, "{} {} not found in data directory", what, self.location())
            }
            MismatchKind::MissingFromTemplate => write!(
                f,
                "data directory has {} {} not described by the template",
                what,
                self.location()
            ),
        }
    }
}
