//! Configuration types for dosshell.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_true() -> bool {
    true
}

/// Shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    /// Show and match long file names instead of 8.3 names.
    #[serde(default = "default_true")]
    pub long_names: bool,

    /// Whether batch lines are echoed before they run.
    #[serde(default = "default_true")]
    pub echo: bool,

    /// Drive letters mapped to host directories.
    #[serde(default)]
    pub drives: BTreeMap<String, String>,

    /// Initial environment variables (`DIRCMD`, `COPYCMD`, `PATH`, ...).
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Message catalog overrides keyed by message key.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,

    /// Property sections; a property name typed as a command reads or sets it.
    #[serde(default)]
    pub properties: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            long_names: true,
            echo: true,
            drives: BTreeMap::new(),
            environment: BTreeMap::new(),
            messages: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// The configured drives as upper-case letters with host paths.
    ///
    /// # Errors
    ///
    /// * If a key is not a single ASCII letter
    pub fn drive_mounts(&self) -> Result<Vec<(char, PathBuf)>, ConfigError> {
        self.drives
            .iter()
            .map(|(letter, path)| Ok((parse_drive_letter(letter)?, PathBuf::from(path))))
            .collect()
    }
}

/// Parse `C`, `c` or `C:` into an upper-case drive letter.
///
/// # Errors
///
/// * If the text is not a single ASCII letter with an optional colon
pub fn parse_drive_letter(text: &str) -> Result<char, ConfigError> {
    let trimmed = text.trim().trim_end_matches(':');
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(ConfigError::InvalidDriveLetter(text.to_string())),
    }
}

/// A loaded configuration with metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: ShellConfig,
    /// Absolute path to the configuration file, if one was read.
    pub config_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drive_letter() {
        assert_eq!(parse_drive_letter("c").unwrap(), 'C');
        assert_eq!(parse_drive_letter("D:").unwrap(), 'D');
        assert!(parse_drive_letter("CD").is_err());
        assert!(parse_drive_letter("1").is_err());
        assert!(parse_drive_letter("").is_err());
    }

    #[test]
    fn test_drive_mounts() {
        let mut config = ShellConfig::default();
        config.drives.insert("c".to_string(), "/tmp/c".to_string());
        config.drives.insert("D:".to_string(), "/tmp/d".to_string());

        let mounts = config.drive_mounts().unwrap();
        assert_eq!(
            mounts,
            vec![('D', PathBuf::from("/tmp/d")), ('C', PathBuf::from("/tmp/c"))]
        );
    }
}
