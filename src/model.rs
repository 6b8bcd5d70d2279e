//! Core document types: template tables and fields, and content overlays.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Attribute name -> value for a single field. Sorted for deterministic output.
pub type Attributes = BTreeMap<String, Value>;

/// Serialized next to the attributes of a field; never an attribute itself.
pub const RESERVED_ATTRIBUTE: &str = "name";

/// A field descriptor: name plus free-form attributes (type, description, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An ordered collection of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Table {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Ordered tables making up a metadata template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// The merge output has the same shape as the template.
pub type MergedDocument = Template;

impl Template {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Check that table names, and field names within each table, are unique.
    pub fn check_unique_names(&self) -> Result<(), String> {
        let mut tables = HashSet::new();
        for table in &self.tables {
            if !tables.insert(table.name.as_str()) {
                return Err(format!("duplicate table '{}'", table.name));
            }
            let mut fields = HashSet::new();
            for field in &table.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(format!(
                        "duplicate field '{}' in table '{}'",
                        field.name, table.name
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One content value as written by the user: a bare scalar, or an attribute map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Attributes(Attributes),
    Scalar(Value),
}

impl ContentEntry {
    /// Resolve to an attribute map; scalars set `scalar_attribute`, an empty
    /// entry (null) sets nothing.
    pub fn into_attributes(self, scalar_attribute: &str) -> Attributes {
        match self {
            ContentEntry::Attributes(attrs) => attrs,
            ContentEntry::Scalar(Value::Null) => Attributes::new(),
            ContentEntry::Scalar(value) => {
                let mut attrs = Attributes::new();
                attrs.insert(scalar_attribute.to_string(), value);
                attrs
            }
        }
    }
}

/// Table -> field -> attributes to apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    tables: BTreeMap<String, BTreeMap<String, Attributes>>,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the raw user form, resolving scalar shorthand.
    pub fn from_entries(
        raw: BTreeMap<String, BTreeMap<String, ContentEntry>>,
        scalar_attribute: &str,
    ) -> Self {
        let mut content = Content::new();
        for (table, fields) in raw {
            for (field, entry) in fields {
                content.set(&table, &field, entry.into_attributes(scalar_attribute));
            }
        }
        content
    }

    /// Apply attributes to (table, field); later values win per attribute key.
    ///
    /// Null values carry no content and are dropped. The reserved `name` key is
    /// dropped with a warning.
    pub fn set(&mut self, table: &str, field: &str, mut attributes: Attributes) {
        if attributes.remove(RESERVED_ATTRIBUTE).is_some() {
            warn!(
                table,
                field,
                "Ignoring content attribute '{}', it names the field",
                RESERVED_ATTRIBUTE
            );
        }
        attributes.retain(|_, value| !value.is_null());
        let slot = self
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default();
        slot.extend(attributes);
    }

    pub fn insert_attribute(&mut self, table: &str, field: &str, key: &str, value: Value) {
        let mut attrs = Attributes::new();
        attrs.insert(key.to_string(), value);
        self.set(table, field, attrs);
    }

    /// Merge another source into this one. `other` wins for repeated attributes.
    pub fn overlay(&mut self, other: Content) {
        for (table, fields) in other.tables {
            for (field, attrs) in fields {
                self.set(&table, &field, attrs);
            }
        }
    }

    pub fn get(&self, table: &str, field: &str) -> Option<&Attributes> {
        self.tables.get(table).and_then(|fields| fields.get(field))
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Attributes>)> {
        self.tables.iter().map(|(name, fields)| (name.as_str(), fields))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of (table, field) entries.
    pub fn len(&self) -> usize {
        self.tables.values().map(|fields| fields.len()).sum()
    }
}
