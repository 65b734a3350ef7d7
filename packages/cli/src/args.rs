//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use dosshell_config::parse_drive_letter;

/// CLI arguments for dosshell.
#[derive(Debug, Parser)]
#[command(
    name = "dosshell",
    about = "A DOS command shell over host directories",
    version
)]
pub struct Args {
    /// Batch file to run instead of the interactive prompt.
    #[arg(index = 1)]
    pub batch: Option<String>,

    /// Parameters passed to the batch file as %1, %2, ...
    #[arg(index = 2, trailing_var_arg = true)]
    pub batch_args: Vec<String>,

    /// Mount a host directory as a drive, e.g. `C=./games` (repeatable).
    #[arg(long, short = 'm', value_parser = parse_mount)]
    pub mount: Vec<(char, PathBuf)>,

    /// Run one command line and exit with its errorlevel.
    #[arg(long, short = 'c')]
    pub command: Option<String>,

    /// Configuration file to use instead of the discovered one.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show and match 8.3 names only.
    #[arg(long = "short-names")]
    pub short_names: bool,

    /// Enable verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Parse `DRIVE=PATH`.
///
/// # Errors
///
/// * If there is no `=` or the drive is not a single letter
pub fn parse_mount(value: &str) -> Result<(char, PathBuf), String> {
    let (drive, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DRIVE=PATH, got `{value}`"))?;
    if path.is_empty() {
        return Err(format!("no path given for drive {drive}"));
    }
    let drive = parse_drive_letter(drive).map_err(|e| e.to_string())?;
    Ok((drive, PathBuf::from(path)))
}
