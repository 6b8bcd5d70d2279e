//! Merger
//!
//! Overlays content attributes onto template fields. The merge is a pure
//! transform: tables and fields not in the template are never added, they are
//! reported as mismatches instead.

use crate::error::{Mismatch, MismatchKind};
use crate::model::{Content, MergedDocument, Template};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Options controlling a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Only these tables are processed; others pass through unchanged.
    pub tables_filter: Option<BTreeSet<String>>,
    /// Discard template attributes of processed tables before applying content.
    pub drop_template_attributes: bool,
}

impl MergeOptions {
    pub fn includes(&self, table: &str) -> bool {
        self.tables_filter
            .as_ref()
            .map_or(true, |filter| filter.contains(table))
    }
}

/// Result of a merge: the document plus any content the template could not place.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: MergedDocument,
    pub mismatches: Vec<Mismatch>,
    /// Number of fields that received content.
    pub fields_updated: usize,
}

pub fn merge(template: &Template, content: &Content, options: &MergeOptions) -> MergeOutcome {
    let mut document = template.clone();
    let mut fields_updated = 0;

    for table in document.tables.iter_mut() {
        if !options.includes(&table.name) {
            continue;
        }
        for field in table.fields.iter_mut() {
            if options.drop_template_attributes {
                field.attributes.clear();
            }
            let attrs = content
                .get(&table.name, &field.name)
                .filter(|attrs| !attrs.is_empty());
            if let Some(attrs) = attrs {
                debug!(table = %table.name, field = %field.name, "Applying content");
                field
                    .attributes
                    .extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
                fields_updated += 1;
            }
        }
    }

    let mut mismatches = Vec::new();
    if let Some(filter) = &options.tables_filter {
        for name in filter {
            if template.table(name).is_none() {
                mismatches.push(Mismatch::content(MismatchKind::UnknownTable, name, None));
            }
        }
    }
    for (table_name, fields) in content.tables() {
        if !options.includes(table_name) {
            continue;
        }
        let table = template.table(table_name);
        if table.is_none() && options.tables_filter.is_some() {
            // already reported as a filter name missing from the template
            continue;
        }
        for field_name in fields.keys() {
            let kind = match table {
                None => MismatchKind::UnknownTable,
                Some(t) if t.field(field_name).is_none() => MismatchKind::UnknownField,
                Some(_) => continue,
            };
            mismatches.push(Mismatch::content(kind, table_name, Some(field_name.as_str())));
        }
    }
    for mismatch in &mismatches {
        warn!("{}", mismatch);
    }

    MergeOutcome {
        document,
        mismatches,
        fields_updated,
    }
}
