//! Template and content loading
//!
//! Templates come from structured files (JSON, YAML, TOML). Content comes from
//! structured files or from CSV tables with one row per field, where table and
//! field columns may use any of several common header names.

use crate::error::MetapushError;
use crate::format::{self, DocumentFormat};
use crate::model::{Attributes, Content, ContentEntry, Template, RESERVED_ATTRIBUTE};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Canonical key for the column holding a table name.
pub const TABLE_KEY: &str = "entity_name";
/// Canonical key for the column holding a field name.
pub const FIELD_KEY: &str = "attribute_name";

const TABLE_ALIASES: &[&str] = &["entity", "table_name", "table", "layer"];
const FIELD_ALIASES: &[&str] = &["attribute", "field_name", "field", "column_name", "column"];

/// Find the header index for `key`; an exact match beats any alias.
pub fn find_column<'a, I>(headers: I, key: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let normalized: Vec<String> = headers
        .into_iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    if let Some(idx) = normalized.iter().position(|h| h == key) {
        return Some(idx);
    }
    let aliases: &[&str] = match key {
        TABLE_KEY => TABLE_ALIASES,
        FIELD_KEY => FIELD_ALIASES,
        _ => &[],
    };
    aliases
        .iter()
        .find_map(|alias| normalized.iter().position(|h| h == alias))
}

/// Load a template and check name uniqueness.
pub fn load_template(path: &Path) -> Result<Template, MetapushError> {
    let template: Template = format::read_structured(path)?;
    template
        .check_unique_names()
        .map_err(|reason| MetapushError::input(path, reason))?;
    info!(
        path = %path.display(),
        tables = template.tables.len(),
        "Loaded template"
    );
    Ok(template)
}

/// Load one content source.
pub fn load_content(path: &Path, scalar_attribute: &str) -> Result<Content, MetapushError> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| MetapushError::UnsupportedFormat(path.to_path_buf()))?;
    let content = if format.is_structured() {
        let raw: BTreeMap<String, BTreeMap<String, ContentEntry>> =
            format::read_structured(path)?;
        Content::from_entries(raw, scalar_attribute)
    } else {
        load_csv_content(path)?
    };
    info!(path = %path.display(), entries = content.len(), "Loaded content");
    Ok(content)
}

/// Load and combine content sources in order; later sources win per attribute.
pub fn load_content_sources(
    paths: &[PathBuf],
    scalar_attribute: &str,
) -> Result<Content, MetapushError> {
    let mut combined = Content::new();
    for path in paths {
        combined.overlay(load_content(path, scalar_attribute)?);
    }
    Ok(combined)
}

fn load_csv_content(path: &Path) -> Result<Content, MetapushError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| MetapushError::input(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| MetapushError::input(path, e))?
        .clone();

    let table_col = find_column(headers.iter(), TABLE_KEY);
    let field_col = find_column(headers.iter(), FIELD_KEY).ok_or_else(|| {
        MetapushError::input(
            path,
            format!(
                "no field column (expected '{}' or one of: {})",
                FIELD_KEY,
                FIELD_ALIASES.join(", ")
            ),
        )
    })?;
    let default_table = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    if table_col.is_none() {
        debug!(table = %default_table, "No table column, using file stem");
    }
    let reserved_col = headers.iter().position(|h| h == RESERVED_ATTRIBUTE);
    if reserved_col.is_some() {
        warn!(path = %path.display(), "Ignoring '{}' column, it names the field", RESERVED_ATTRIBUTE);
    }

    let mut content = Content::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| MetapushError::input(path, e))?;
        // header is line 1
        let line = idx + 2;
        let table = match table_col {
            Some(col) => record.get(col).unwrap_or_default(),
            None => default_table.as_str(),
        };
        let field = record.get(field_col).unwrap_or_default();
        if table.is_empty() || field.is_empty() {
            warn!(path = %path.display(), line, "Skipping row without table or field name");
            continue;
        }

        let mut attributes = Attributes::new();
        for (col, header) in headers.iter().enumerate() {
            if Some(col) == table_col
                || Some(col) == reserved_col
                || col == field_col
                || header.is_empty()
            {
                continue;
            }
            match record.get(col) {
                Some(cell) if !cell.is_empty() => {
                    attributes.insert(header.to_string(), Value::String(cell.to_string()));
                }
                _ => {}
            }
        }
        content.set(table, field, attributes);
    }
    Ok(content)
}
