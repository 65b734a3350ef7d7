//! The filesystem interface the command engine is written against.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::entry::{Attributes, DirectoryEntry, DosDateTime};
use crate::error::FsError;

/// An open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u16);

/// How [`FileSystem::open_file`] opens an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    ReadWrite,
}

/// The result cursor of one enumeration: every match of the last
/// `find_first` and the position of the current one.
#[derive(Debug, Clone, Default)]
pub struct SearchCursor {
    entries: Vec<DirectoryEntry>,
    position: usize,
}

impl SearchCursor {
    /// Start a cursor over the given matches.
    #[must_use]
    pub const fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            entries,
            position: 0,
        }
    }

    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&DirectoryEntry> {
        self.entries.get(self.position)
    }

    /// Move to the next entry, returning whether there is one.
    pub fn advance(&mut self) -> bool {
        if self.position < self.entries.len() {
            self.position += 1;
        }
        self.position < self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A set of drive letters with a current directory each, a single search
/// cursor and a handle table.
///
/// Paths are DOS paths (`C:\DIR\FILE.TXT`, `..\X`, `FILE`); anything that is
/// not fully qualified is resolved against the default drive and that
/// drive's current directory.
pub trait FileSystem {
    /// Whether long names are shown and matched.
    fn long_names(&self) -> bool;

    fn set_long_names(&mut self, enabled: bool);

    /// The default drive letter (upper case).
    fn default_drive(&self) -> char;

    /// # Errors
    ///
    /// * If the drive is not mounted
    fn set_default_drive(&mut self, drive: char) -> Result<(), FsError>;

    /// The current directory of a drive as `X:\PATH`.
    ///
    /// # Errors
    ///
    /// * If the drive is not mounted
    fn current_dir(&self, drive: char) -> Result<String, FsError>;

    /// # Errors
    ///
    /// * If the path is not an existing directory
    fn change_dir(&mut self, path: &str) -> Result<(), FsError>;

    /// # Errors
    ///
    /// * If the parent does not exist or the name is taken
    fn make_dir(&mut self, path: &str) -> Result<(), FsError>;

    /// # Errors
    ///
    /// * If the directory does not exist, is not empty or is current
    fn remove_dir(&mut self, path: &str) -> Result<(), FsError>;

    /// # Errors
    ///
    /// * If the drive is not mounted
    fn volume_label(&self, drive: char) -> Result<String, FsError>;

    /// Free bytes reported for a drive.
    ///
    /// # Errors
    ///
    /// * If the drive is not mounted
    fn free_space(&self, drive: char) -> Result<u64, FsError>;

    /// Turn a typed path into a fully qualified `X:\A\B` path.
    ///
    /// # Errors
    ///
    /// * If the drive is not mounted or the path contains illegal characters
    fn canonicalize(&self, raw: &str) -> Result<String, FsError>;

    /// Resolve every existing component of a path to its short (or long)
    /// name. A final component that does not exist is kept as typed.
    ///
    /// # Errors
    ///
    /// * If the path cannot be canonicalized or a parent directory is missing
    fn to_short_path(&self, path: &str, want_long: bool) -> Result<String, FsError>;

    /// Whether the final component names a character device (`NUL`, `CON`, ...).
    fn is_device(&self, path: &str) -> bool {
        device_name(path).is_some()
    }

    /// Start an enumeration. Entries are included when their hidden, system
    /// and directory bits are all present in `mask`.
    fn find_first(&mut self, pattern: &str, mask: Attributes) -> bool;

    /// Advance the enumeration started by [`FileSystem::find_first`].
    fn find_next(&mut self) -> bool;

    /// The entry the enumeration currently points at.
    fn result(&self) -> Option<&DirectoryEntry>;

    /// Detach the search cursor, leaving an empty one behind.
    fn take_cursor(&mut self) -> SearchCursor;

    /// Put a previously detached cursor back.
    fn restore_cursor(&mut self, cursor: SearchCursor);

    /// # Errors
    ///
    /// * If nothing exists at the path
    fn attributes(&self, path: &str) -> Result<Attributes, FsError>;

    /// # Errors
    ///
    /// * If nothing exists at the path
    fn set_attributes(&mut self, path: &str, attributes: Attributes) -> Result<(), FsError>;

    /// # Errors
    ///
    /// * If the source is missing or the target already exists
    fn rename(&mut self, from: &str, to: &str) -> Result<(), FsError>;

    /// Delete a file. Directories and read-only files are refused.
    ///
    /// # Errors
    ///
    /// * If the file is missing, read-only or a directory
    fn unlink(&mut self, path: &str) -> Result<(), FsError>;

    /// Create or truncate a file and open it for writing.
    ///
    /// # Errors
    ///
    /// * If the parent is missing or the existing file is read-only
    fn create_file(&mut self, path: &str) -> Result<Handle, FsError>;

    /// # Errors
    ///
    /// * If the file is missing or is a directory
    fn open_file(&mut self, path: &str, mode: OpenMode) -> Result<Handle, FsError>;

    /// # Errors
    ///
    /// * If the handle is not open
    fn close_file(&mut self, handle: Handle) -> Result<(), FsError>;

    /// Read up to `buf.len()` bytes; `0` means end of file.
    ///
    /// # Errors
    ///
    /// * If the handle is not open or the read fails
    fn read_bytes(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize, FsError>;

    /// # Errors
    ///
    /// * If the handle is not open or the write fails
    fn write_bytes(&mut self, handle: Handle, data: &[u8]) -> Result<usize, FsError>;

    /// Move to the end of the file, returning the new position.
    ///
    /// # Errors
    ///
    /// * If the handle is not open or the seek fails
    fn seek_to_end(&mut self, handle: Handle) -> Result<u64, FsError>;

    /// # Errors
    ///
    /// * If the handle is not open
    fn file_time(&self, handle: Handle) -> Result<DosDateTime, FsError>;

    /// # Errors
    ///
    /// * If the handle is not open or the stamp cannot be applied
    fn set_file_time(&mut self, handle: Handle, stamp: DosDateTime) -> Result<(), FsError>;
}

const DEVICES: &[&str] = &[
    "NUL", "CON", "PRN", "AUX", "CLOCK$", "LPT1", "LPT2", "LPT3", "COM1", "COM2", "COM3", "COM4",
];

/// The device a path names, if any. `CON`, `con.txt` and `C:\DIR\NUL` all
/// name a device; the directory part and extension are ignored.
#[must_use]
pub fn device_name(path: &str) -> Option<&'static str> {
    let trimmed = path.trim().trim_matches('"').trim_end_matches(':');
    let last = trimmed
        .rfind(['\\', '/', ':'])
        .map_or(trimmed, |idx| &trimmed[idx + 1..]);
    let base = last.split('.').next().unwrap_or(last);

    DEVICES
        .iter()
        .find(|device| device.eq_ignore_ascii_case(base))
        .copied()
}
