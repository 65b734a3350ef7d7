//! Configuration file discovery.
//!
//! An explicit `--config` path wins; otherwise `dosshell.toml` in the
//! platform configuration directory is used when it exists.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name looked up in the configuration directory.
pub const CONFIG_FILE_NAME: &str = "dosshell.toml";

/// The default configuration path, `<config dir>/dosshell/dosshell.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dosshell").join(CONFIG_FILE_NAME))
}

/// Decide which configuration file to load.
///
/// # Arguments
///
/// * `explicit` - Path given on the command line, if any
///
/// # Errors
///
/// * If an explicit path was given but is not a file
pub fn discover_config(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        log::debug!("Using explicit config {}", path.display());
        if !path.is_file() {
            return Err(ConfigError::InvalidPath(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let found = default_config_path().filter(|path| path.is_file());
    match &found {
        Some(path) => log::debug!("Found config {}", path.display()),
        None => log::debug!("No config file found, using defaults"),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");

        assert!(matches!(
            discover_config(Some(&missing)),
            Err(ConfigError::InvalidPath(_))
        ));

        let present = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&present, "").unwrap();
        assert_eq!(discover_config(Some(&present)).unwrap(), Some(present));
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("dosshell/dosshell.toml"));
        }
    }
}
