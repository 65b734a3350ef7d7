//! dosshell CLI entry point.
//!
//! Mounts host directories as DOS drives and runs a command line, a batch
//! file, or an interactive prompt over them.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use clap::Parser;

use args::Args;
use dosshell_commands::{Shell, TermConsole};
use dosshell_config::{ShellConfig, discover_config, load_config};

fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        // SAFETY: We're setting this before any other threads are spawned
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    pretty_env_logger::init();

    match run(args) {
        Ok(errorlevel) => std::process::exit(i32::from(errorlevel)),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Drives from the config file, overridden letter by letter from the
/// command line. With none at all the current directory becomes `C:`.
fn resolve_mounts(
    config: &ShellConfig,
    overrides: &[(char, PathBuf)],
) -> Result<Vec<(char, PathBuf)>, Box<dyn std::error::Error>> {
    let mut mounts: BTreeMap<char, PathBuf> = config.drive_mounts()?.into_iter().collect();
    for (drive, root) in overrides {
        if let Some(previous) = mounts.insert(*drive, root.clone()) {
            log::debug!("--mount replaces {drive}: at {}", previous.display());
        }
    }
    if mounts.is_empty() {
        mounts.insert('C', env::current_dir()?);
    }
    Ok(mounts.into_iter().collect())
}

/// Main application logic. Returns the errorlevel to exit with.
fn run(args: Args) -> Result<u8, Box<dyn std::error::Error>> {
    let config_path = discover_config(args.config.as_deref())?;
    let loaded = load_config(config_path.as_deref())?;
    let mut config = loaded.config;
    if args.short_names {
        config.long_names = false;
    }

    let mounts = resolve_mounts(&config, &args.mount)?;
    let mut shell = Shell::from_config(&config, &mounts, Box::new(TermConsole::new()))?;

    if let Some(line) = &args.command {
        if args.batch.is_some() {
            output::print_warning("--command given, ignoring the batch file argument");
        }
        shell.execute(line);
        return Ok(shell.errorlevel());
    }

    if let Some(batch) = &args.batch {
        shell.run_batch(batch, &args.batch_args)?;
        return Ok(shell.errorlevel());
    }

    output::print_header(&format!("dosshell {}", env!("CARGO_PKG_VERSION")));
    if let Some(path) = &loaded.config_path {
        log::debug!("Loaded config from {}", path.display());
    }
    output::print_mounts(&mounts);
    shell.run_interactive();
    Ok(shell.errorlevel())
}
