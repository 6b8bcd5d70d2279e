//! Config sources: global file, explicit file, METAPUSH__* environment.

use super::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

/// Add the global config file, if one exists.
pub fn add_global_file(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match paths::global_config_path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}

/// Add an explicitly requested config file; it must exist.
pub fn add_explicit_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}

/// Add environment variable overlay to builder.
/// Uses METAPUSH prefix and __ as separator for nested keys.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("METAPUSH")
            .separator("__")
            .try_parsing(true),
    ))
}
