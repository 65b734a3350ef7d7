//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use colored::Colorize;

/// Print the banner shown before the interactive prompt.
pub fn print_header(message: &str) {
    println!("{}\n", message.bold());
}

/// Print the drive table.
pub fn print_mounts(mounts: &[(char, PathBuf)]) {
    for (drive, root) in mounts {
        println!(
            "  {} {}",
            format!("{drive}:").yellow(),
            root.display().to_string().dimmed()
        );
    }
    println!();
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}
