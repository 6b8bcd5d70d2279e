//! Writing the merged document.

use crate::error::MetapushError;
use crate::format::{self, DocumentFormat};
use crate::model::MergedDocument;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serialization settings for the output document.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub overwrite: bool,
    /// Used when the output extension does not name a structured format.
    pub default_format: DocumentFormat,
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            default_format: DocumentFormat::Json,
            pretty: true,
        }
    }
}

/// Fail with `OutputExists` when `path` exists and overwriting is not allowed.
pub fn check_output(path: &Path, overwrite: bool) -> Result<(), MetapushError> {
    if path.exists() && !overwrite {
        return Err(MetapushError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// Output format for `path`: its extension if structured, else `fallback`.
pub fn output_format(path: &Path, fallback: DocumentFormat) -> DocumentFormat {
    DocumentFormat::from_path(path)
        .filter(|f| f.is_structured())
        .unwrap_or(fallback)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn strip_nested_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nested_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nested_nulls);
        }
        _ => {}
    }
}

/// Copy of `document` without null attribute values. TOML has no null.
fn without_nulls(document: &MergedDocument) -> MergedDocument {
    let mut document = document.clone();
    for field in document.tables.iter_mut().flat_map(|t| t.fields.iter_mut()) {
        let before = field.attributes.len();
        field.attributes.retain(|_, v| !v.is_null());
        if field.attributes.len() != before {
            debug!(field = %field.name, "Dropped null attributes for TOML output");
        }
        field.attributes.values_mut().for_each(strip_nested_nulls);
    }
    document
}

/// Serialize and write the document (write-then-rename).
pub fn write(
    document: &MergedDocument,
    path: &Path,
    options: &WriteOptions,
) -> Result<(), MetapushError> {
    check_output(path, options.overwrite)?;

    let format = output_format(path, options.default_format);
    let text = if format == DocumentFormat::Toml {
        format::serialize(&without_nulls(document), format, options.pretty)?
    } else {
        format::serialize(document, format, options.pretty)?
    };

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, text).map_err(|source| MetapushError::Write {
        path: temp_path.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(MetapushError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), format = ?format, "Wrote merged document");
    Ok(())
}
