//! Error types for pattern handling.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error;

/// Errors that can occur while compiling or applying a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern could not be compiled into a matcher.
    #[error("Invalid wildcard pattern {pattern}: {source}")]
    InvalidPattern {
        /// The pattern as typed by the user.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// No `*` could be located in the final component of the source pattern.
    #[error("Illegal path: no wildcard position in {0}")]
    MissingWildcardOffset(String),
}
