//! ConfigLoader facade over the config sources.

use super::sources;
use super::MetapushConfig;
use crate::error::MetapushError;
use config::Config;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<MetapushConfig, MetapushError> {
        let builder = Config::builder();
        let builder = sources::add_global_file(builder)?;
        let builder = match explicit {
            Some(path) => sources::add_explicit_file(builder, path)?,
            None => builder,
        };
        let builder = sources::add_environment(builder)?;

        let config: MetapushConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(MetapushError::ConfigError)?;
        Ok(config)
    }

    /// Load configuration from a specific file only (no global file, no environment).
    pub fn load_from_file(path: &Path) -> Result<MetapushConfig, MetapushError> {
        let builder = sources::add_explicit_file(Config::builder(), path)?;
        let config: MetapushConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(MetapushError::ConfigError)?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> MetapushConfig {
        MetapushConfig::default()
    }
}
