//! Data directory consistency check
//!
//! Top-level entries of the data directory are tables. A directory table is
//! named by its full directory name and its entries are its fields (by file
//! stem); a `.csv` table is named by its file stem and its header row names its
//! fields. Other files are tables whose fields are not checked. Symlinks are
//! followed.

use crate::error::{MetapushError, Mismatch, MismatchKind};
use crate::merge::MergeOptions;
use crate::model::MergedDocument;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Tables and fields found in a data directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataLayout {
    /// Table name -> field names, or `None` when fields cannot be listed.
    pub tables: BTreeMap<String, Option<BTreeSet<String>>>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Sorted, non-hidden immediate children of `dir`, following symlinks.
///
/// Failing to read `dir` itself is an error; an unreadable child (such as a
/// dangling symlink) is skipped with a warning.
fn children(dir: &Path) -> Result<Vec<DirEntry>, walkdir::Error> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() > 0 => {
                warn!(error = %err, "Skipping unreadable data entry");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(entries)
}

fn csv_header_fields(path: &Path) -> Option<BTreeSet<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .ok()?;
    let headers = reader.headers().ok()?;
    Some(
        headers
            .iter()
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Scan the data directory layout.
pub fn scan_data_dir(data_path: &Path) -> Result<DataLayout, MetapushError> {
    if !data_path.exists() {
        return Err(MetapushError::data_path(data_path, "not found"));
    }
    if !data_path.is_dir() {
        return Err(MetapushError::data_path(data_path, "not a directory"));
    }

    let mut layout = DataLayout::default();
    for entry in children(data_path).map_err(|e| MetapushError::data_path(data_path, e))? {
        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        let table = if is_dir { file_name(path) } else { stem(path) };
        let Some(table) = table else { continue };
        let fields = if is_dir {
            let entries = children(path).map_err(|e| MetapushError::data_path(path, e))?;
            Some(entries.iter().filter_map(|e| stem(e.path())).collect())
        } else if is_csv(path) {
            let fields = csv_header_fields(path);
            if fields.is_none() {
                warn!(path = %path.display(), "Could not read CSV header, fields not checked");
            }
            fields
        } else {
            None
        };
        match layout.tables.entry(table) {
            Entry::Occupied(existing) => {
                warn!(
                    table = %existing.key(),
                    path = %path.display(),
                    "Duplicate data table, keeping the first entry"
                );
            }
            Entry::Vacant(slot) => {
                debug!(table = %slot.key(), fields = ?fields, "Found data table");
                slot.insert(fields);
            }
        }
    }
    Ok(layout)
}

/// Compare the document's tables and fields with a scanned layout.
pub fn compare_layout(
    document: &MergedDocument,
    layout: &DataLayout,
    options: &MergeOptions,
) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    for table in document.tables.iter().filter(|t| options.includes(&t.name)) {
        let Some(data_fields) = layout.tables.get(&table.name) else {
            mismatches.push(Mismatch::data(MismatchKind::MissingFromData, &table.name, None));
            continue;
        };
        let Some(data_fields) = data_fields else { continue };
        for field in &table.fields {
            if !data_fields.contains(&field.name) {
                mismatches.push(Mismatch::data(
                    MismatchKind::MissingFromData,
                    &table.name,
                    Some(field.name.as_str()),
                ));
            }
        }
        for name in data_fields {
            if table.field(name).is_none() {
                mismatches.push(Mismatch::data(
                    MismatchKind::MissingFromTemplate,
                    &table.name,
                    Some(name.as_str()),
                ));
            }
        }
    }

    for name in layout.tables.keys() {
        if options.includes(name) && document.table(name).is_none() {
            mismatches.push(Mismatch::data(MismatchKind::MissingFromTemplate, name, None));
        }
    }
    mismatches
}

/// Check the merged document against a data directory.
///
/// A missing or unreadable `data_path` is an error for this check only.
pub fn validate_against_data(
    document: &MergedDocument,
    data_path: &Path,
    options: &MergeOptions,
) -> Result<Vec<Mismatch>, MetapushError> {
    let layout = scan_data_dir(data_path)?;
    let mismatches = compare_layout(document, &layout, options);
    for mismatch in &mismatches {
        warn!("{}", mismatch);
    }
    info!(
        path = %data_path.display(),
        tables = layout.tables.len(),
        mismatches = mismatches.len(),
        "Validated against data directory"
    );
    Ok(mismatches)
}
