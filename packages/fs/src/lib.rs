//! Drive-letter filesystem for dosshell.
//!
//! This crate provides everything the command engine needs from a disk:
//!
//! * [`DirectoryEntry`], [`Attributes`] and packed [`DosDateTime`] stamps
//! * The [`FileSystem`] trait: path canonicalization, short-name resolution,
//!   find-first/find-next enumeration and file mutation
//! * [`HostFileSystem`], which mounts host directories as `C:`, `D:`, ...
//!
//! # Example
//!
//! ```rust,ignore
//! use dosshell_fs::{Attributes, FileSystem, HostFileSystem};
//!
//! let mut fs = HostFileSystem::new();
//! fs.mount('C', "/tmp/dos")?;
//! if fs.find_first("C:\\*.TXT", Attributes::FILES_ONLY) {
//!     loop {
//!         println!("{}", fs.result().unwrap().long_name);
//!         if !fs.find_next() {
//!             break;
//!         }
//!     }
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod entry;
mod error;
mod filesystem;
mod host;
mod short_name;

pub use entry::{Attributes, DirectoryEntry, DosDateTime};
pub use error::FsError;
pub use filesystem::{FileSystem, Handle, OpenMode, SearchCursor, device_name};
pub use host::HostFileSystem;
pub use short_name::{assign_short_names, is_short_name};
