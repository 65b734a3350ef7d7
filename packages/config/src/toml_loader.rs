//! TOML configuration file loader.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::ShellConfig;

/// Load a TOML configuration file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML
/// * If a `[drives]` key is not a drive letter
pub fn load_toml_config(path: &Path) -> Result<ShellConfig, ConfigError> {
    log::debug!("Loading TOML config from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ShellConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mounts = config.drive_mounts()?;
    let letters: String = mounts.iter().map(|(letter, _)| *letter).collect();
    log::debug!(
        "Loaded config: drive(s) [{letters}], {} environment variable(s)",
        config.environment.len()
    );

    Ok(config)
}
