//! Error types for the drive-letter filesystem.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`crate::FileSystem`] operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// The drive letter is not mounted.
    #[error("Invalid drive {0}:")]
    InvalidDrive(char),

    /// The path cannot be resolved to a location on a mounted drive.
    #[error("Illegal path {0}")]
    IllegalPath(String),

    /// Nothing exists at the resolved location.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entry exists but the operation is not permitted (read-only file,
    /// directory where a file is expected, non-empty directory).
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The target of a create or rename already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The file handle is not open.
    #[error("Invalid handle {0}")]
    InvalidHandle(u16),

    /// Host IO failure.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Host path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
