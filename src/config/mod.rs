//! Configuration
//!
//! Layered configuration: built-in defaults, the global config file, an
//! explicit `--config` file, then `METAPUSH__*` environment variables.

mod facade;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::format::DocumentFormat;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetapushConfig {
    pub merge: MergeConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Merge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Attribute set by a bare scalar content value.
    pub scalar_attribute: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            scalar_attribute: "description".to_string(),
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the output extension is not recognized.
    pub default_format: DocumentFormat,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: DocumentFormat::Json,
            pretty: true,
        }
    }
}

impl MetapushConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.merge.scalar_attribute.trim().is_empty() {
            return Err("merge.scalar_attribute cannot be empty".to_string());
        }
        if !self.output.default_format.is_structured() {
            return Err("output.default_format must be json, yaml or toml".to_string());
        }
        Ok(())
    }
}
