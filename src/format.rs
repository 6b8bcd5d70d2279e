//! Document formats: detection by file extension, parsing and serialization.

use crate::error::MetapushError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk format of a template, content source or output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
    /// Content sources only.
    Csv,
}

impl DocumentFormat {
    /// Detect from extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    pub fn is_structured(self) -> bool {
        !matches!(self, DocumentFormat::Csv)
    }
}

/// Parse a structured document. CSV is handled by the content loader.
pub fn parse<T: DeserializeOwned>(
    text: &str,
    format: DocumentFormat,
    path: &Path,
) -> Result<T, MetapushError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| MetapushError::input(path, e)),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| MetapushError::input(path, e)),
        DocumentFormat::Toml => toml::from_str(text).map_err(|e| MetapushError::input(path, e)),
        DocumentFormat::Csv => Err(MetapushError::input(
            path,
            "CSV is only supported for content sources",
        )),
    }
}

/// Read and parse a structured file, picking the format from its extension.
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, MetapushError> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| MetapushError::UnsupportedFormat(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path).map_err(|e| MetapushError::input(path, e))?;
    parse(&text, format, path)
}

/// Serialize a document. Text always ends with a newline.
pub fn serialize<T: Serialize>(
    value: &T,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String, MetapushError> {
    let mut text = match format {
        DocumentFormat::Json => {
            if pretty {
                serde_json::to_string_pretty(value)
            } else {
                serde_json::to_string(value)
            }
            .map_err(|e| MetapushError::Serialize(e.to_string()))?
        }
        DocumentFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| MetapushError::Serialize(e.to_string()))?
        }
        DocumentFormat::Toml => {
            if pretty {
                toml::to_string_pretty(value)
            } else {
                toml::to_string(value)
            }
            .map_err(|e| MetapushError::Serialize(e.to_string()))?
        }
        DocumentFormat::Csv => {
            return Err(MetapushError::Serialize(
                "CSV output is not supported".to_string(),
            ))
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
