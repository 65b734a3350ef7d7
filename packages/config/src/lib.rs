//! Configuration loading for dosshell.
//!
//! This crate provides the shell configuration, the message catalog every
//! command prints through, and the property store consulted when a typed
//! command is not a built-in.
//!
//! # Example
//!
//! ```rust,ignore
//! use dosshell_config::{discover_config, load_config};
//!
//! let loaded = load_config(discover_config(None)?.as_deref())?;
//! println!("long names: {}", loaded.config.long_names);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod error;
mod messages;
mod properties;
mod toml_loader;
mod types;

pub use discovery::{CONFIG_FILE_NAME, default_config_path, discover_config};
pub use error::ConfigError;
pub use messages::{MESSAGE_NOT_FOUND, MessageCatalog};
pub use properties::PropertyStore;
pub use toml_loader::load_toml_config;
pub use types::{LoadedConfig, ShellConfig, parse_drive_letter};

use std::path::Path;

/// Load a configuration file, or the defaults when there is none.
///
/// # Arguments
///
/// * `path` - Path to a TOML configuration file, if one was found
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(LoadedConfig {
            config: ShellConfig::default(),
            config_path: None,
        });
    };

    let config = load_toml_config(path)?;
    let config_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    Ok(LoadedConfig {
        config,
        config_path: Some(config_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let loaded = load_config(None).unwrap();
        assert!(loaded.config.long_names);
        assert!(loaded.config_path.is_none());
    }

    #[test]
    fn test_load_records_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "echo = false\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert!(!loaded.config.echo);
        assert_eq!(loaded.config_path, Some(path));
    }
}
