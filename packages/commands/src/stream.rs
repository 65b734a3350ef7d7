//! File content input for `TYPE` and `COPY`, where `CON` reads the keyboard.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::{FsError, Handle, OpenMode, device_name};

use crate::context::ShellContext;

/// An open source of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStream {
    File(Handle),
    /// The `CON` device: one typed byte per read.
    Console,
}

impl InputStream {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// * If the file cannot be opened
    pub fn open(ctx: &mut ShellContext, path: &str) -> Result<Self, FsError> {
        if device_name(path) == Some("CON") {
            return Ok(Self::Console);
        }
        ctx.fs.open_file(path, OpenMode::Read).map(Self::File)
    }

    #[must_use]
    pub const fn is_console(self) -> bool {
        matches!(self, Self::Console)
    }

    /// Read into `buf`, returning the byte count; `0` at end of input.
    ///
    /// # Errors
    ///
    /// * If the underlying read fails
    pub fn read(self, ctx: &mut ShellContext, buf: &mut [u8]) -> Result<usize, FsError> {
        match self {
            Self::File(handle) => ctx.fs.read_bytes(handle, buf),
            Self::Console => {
                let Some(slot) = buf.first_mut() else {
                    return Ok(0);
                };
                Ok(ctx.console.read_byte().map_or(0, |byte| {
                    *slot = byte;
                    1
                }))
            }
        }
    }

    /// # Errors
    ///
    /// * If the handle is not open
    pub fn close(self, ctx: &mut ShellContext) -> Result<(), FsError> {
        match self {
            Self::File(handle) => ctx.fs.close_file(handle),
            Self::Console => Ok(()),
        }
    }
}
