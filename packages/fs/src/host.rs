//! A [`FileSystem`] backed by host directories mounted as drive letters.
//!
//! Host names are matched case-insensitively against either their long name
//! or the generated 8.3 alias. Attributes the host cannot store (hidden,
//! system, archive, read-only) are kept in an in-memory overlay keyed by
//! host path.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use dosshell_pattern::{MatchOptions, WildcardPattern, split_last_component};
use path_clean::PathClean;

use crate::entry::{Attributes, DirectoryEntry, DosDateTime};
use crate::error::FsError;
use crate::filesystem::{FileSystem, Handle, OpenMode, SearchCursor, device_name};
use crate::short_name::assign_short_names;

/// Bytes reported free on every drive.
const FREE_SPACE: u64 = 100 * 1024 * 1024;

const FIRST_HANDLE: u16 = 5;

const ILLEGAL_CHARS: &[char] = &['<', '>', '|', '"'];

#[derive(Debug)]
struct Drive {
    root: PathBuf,
    label: String,
    /// Long names of the current directory's components below the root.
    current: Vec<String>,
}

#[derive(Debug)]
enum OpenFile {
    Host { file: File, path: PathBuf },
    Null,
}

#[derive(Debug)]
struct HostEntry {
    long: String,
    short: String,
    path: PathBuf,
    metadata: Metadata,
}

/// Where a DOS path lands on the host.
#[derive(Debug)]
struct Location {
    drive: char,
    host: PathBuf,
    long_parts: Vec<String>,
    short_parts: Vec<String>,
    /// `None` when only the final component is missing.
    metadata: Option<Metadata>,
}

impl Location {
    fn is_dir(&self) -> bool {
        self.metadata.as_ref().is_some_and(Metadata::is_dir)
    }

    fn is_root(&self) -> bool {
        self.long_parts.is_empty()
    }
}

/// Host directories mounted as DOS drives.
#[derive(Debug)]
pub struct HostFileSystem {
    drives: BTreeMap<char, Drive>,
    default_drive: char,
    long_names: bool,
    overlay: HashMap<PathBuf, Attributes>,
    handles: BTreeMap<u16, OpenFile>,
    next_handle: u16,
    cursor: SearchCursor,
}

impl Default for HostFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFileSystem {
    /// An empty filesystem with long names enabled and no drives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            drives: BTreeMap::new(),
            default_drive: 'C',
            long_names: true,
            overlay: HashMap::new(),
            handles: BTreeMap::new(),
            next_handle: FIRST_HANDLE,
            cursor: SearchCursor::default(),
        }
    }

    /// Mount a host directory as a drive. The first drive mounted becomes
    /// the default drive.
    ///
    /// # Arguments
    ///
    /// * `drive` - Drive letter, in either case
    /// * `root` - Existing host directory, absolute or relative to the process
    ///
    /// # Errors
    ///
    /// * If the letter is not `A`-`Z`
    /// * If the host directory does not exist
    pub fn mount(&mut self, drive: char, root: impl AsRef<Path>) -> Result<(), FsError> {
        let drive = drive.to_ascii_uppercase();
        if !drive.is_ascii_uppercase() {
            return Err(FsError::InvalidDrive(drive));
        }

        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| FsError::io(root, e))?
                .join(root)
        };
        let root = absolute.clean();
        if !root.is_dir() {
            return Err(FsError::NotFound(root.display().to_string()));
        }

        let label: String = root
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_uppercase().chars().take(11).collect())
            .filter(|l: &String| !l.is_empty())
            .unwrap_or_else(|| "DOSSHELL".to_string());

        log::debug!("Mounting {drive}: at {}", root.display());

        if self.drives.is_empty() {
            self.default_drive = drive;
        }
        self.drives.insert(
            drive,
            Drive {
                root,
                label,
                current: Vec::new(),
            },
        );
        Ok(())
    }

    /// Mounted drive letters in order.
    pub fn drives(&self) -> impl Iterator<Item = char> + '_ {
        self.drives.keys().copied()
    }

    /// The host directory behind a drive.
    #[must_use]
    pub fn host_root(&self, drive: char) -> Option<&Path> {
        self.drives
            .get(&drive.to_ascii_uppercase())
            .map(|d| d.root.as_path())
    }

    fn drive(&self, letter: char) -> Result<&Drive, FsError> {
        let letter = letter.to_ascii_uppercase();
        self.drives.get(&letter).ok_or(FsError::InvalidDrive(letter))
    }

    /// Split a typed path into its drive and normalised components.
    fn split_path(&self, raw: &str) -> Result<(char, Vec<String>), FsError> {
        let trimmed = raw.trim().trim_matches('"');
        if trimmed.is_empty() || trimmed.contains(ILLEGAL_CHARS) {
            return Err(FsError::IllegalPath(raw.to_string()));
        }

        let path = trimmed.replace('/', "\\");
        let (drive, rest) = match path.as_bytes() {
            [d, b':', ..] if d.is_ascii_alphabetic() => {
                (char::from(*d).to_ascii_uppercase(), &path[2..])
            }
            _ => (self.default_drive, path.as_str()),
        };

        let state = self.drive(drive)?;
        let mut parts = if rest.starts_with('\\') {
            Vec::new()
        } else {
            state.current.clone()
        };

        for part in rest.split('\\') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                dots if dots.chars().all(|c| c == '.') => {
                    for _ in 1..dots.len() {
                        parts.pop();
                    }
                }
                part if self.long_names => parts.push(part.to_string()),
                part => parts.push(part.to_ascii_uppercase()),
            }
        }

        Ok((drive, parts))
    }

    fn list_dir(dir: &Path) -> Result<Vec<HostEntry>, FsError> {
        let mut entries = Vec::new();
        for item in fs::read_dir(dir).map_err(|e| FsError::io(dir, e))? {
            let item = item.map_err(|e| FsError::io(dir, e))?;
            let path = item.path();
            let Ok(long) = item.file_name().into_string() else {
                log::warn!("Skipping non UTF-8 name in {}", dir.display());
                continue;
            };
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            entries.push(HostEntry {
                long,
                short: String::new(),
                path,
                metadata,
            });
        }

        entries.sort_by_cached_key(|e| e.long.to_lowercase());

        let longs: Vec<&str> = entries.iter().map(|e| e.long.as_str()).collect();
        let shorts = assign_short_names(&longs);
        for (entry, short) in entries.iter_mut().zip(shorts) {
            entry.short = short;
        }

        Ok(entries)
    }

    fn find_child(dir: &Path, name: &str) -> Result<Option<HostEntry>, FsError> {
        let mut entries = Self::list_dir(dir)?;
        let position = entries
            .iter()
            .position(|e| e.long.eq_ignore_ascii_case(name))
            .or_else(|| {
                entries
                    .iter()
                    .position(|e| e.short.eq_ignore_ascii_case(name))
            });
        Ok(position.map(|idx| entries.swap_remove(idx)))
    }

    fn locate(&self, raw: &str) -> Result<Location, FsError> {
        let (drive, parts) = self.split_path(raw)?;
        let mut host = self.drive(drive)?.root.clone();
        let mut metadata = Some(fs::metadata(&host).map_err(|e| FsError::io(&host, e))?);
        let mut long_parts = Vec::with_capacity(parts.len());
        let mut short_parts = Vec::with_capacity(parts.len());

        for (idx, part) in parts.iter().enumerate() {
            if !metadata.as_ref().is_some_and(Metadata::is_dir) {
                return Err(FsError::IllegalPath(raw.to_string()));
            }

            match Self::find_child(&host, part)? {
                Some(child) => {
                    host = child.path;
                    long_parts.push(child.long);
                    short_parts.push(child.short);
                    metadata = Some(child.metadata);
                }
                None if idx + 1 == parts.len() => {
                    host.push(part);
                    long_parts.push(part.clone());
                    short_parts.push(part.to_ascii_uppercase());
                    metadata = None;
                }
                None => return Err(FsError::IllegalPath(raw.to_string())),
            }
        }

        Ok(Location {
            drive,
            host,
            long_parts,
            short_parts,
            metadata,
        })
    }

    fn locate_existing(&self, raw: &str) -> Result<(Location, Metadata), FsError> {
        let location = self.locate(raw)?;
        let metadata = location
            .metadata
            .clone()
            .ok_or_else(|| FsError::NotFound(raw.to_string()))?;
        Ok((location, metadata))
    }

    fn host_attributes(&self, host: &Path, metadata: &Metadata) -> Attributes {
        if let Some(attributes) = self.overlay.get(host) {
            return *attributes;
        }

        let mut attributes = if metadata.is_dir() {
            Attributes::DIRECTORY
        } else {
            Attributes::ARCHIVE
        };
        if metadata.permissions().readonly() {
            attributes |= Attributes::READ_ONLY;
        }
        attributes
    }

    fn make_entry(
        &self,
        short_name: &str,
        long_name: &str,
        host: &Path,
        metadata: &Metadata,
    ) -> DirectoryEntry {
        let stamp = match metadata.modified() {
            Ok(modified) => DosDateTime::from_system_time(modified),
            Err(e) => {
                log::warn!("No modification time for {}: {e}", host.display());
                DosDateTime::default()
            }
        };

        DirectoryEntry {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
            size: if metadata.is_dir() {
                0
            } else {
                u32::try_from(metadata.len()).unwrap_or(u32::MAX)
            },
            stamp,
            attributes: self.host_attributes(host, metadata),
        }
    }

    fn search(&self, pattern: &str, mask: Attributes) -> Result<Vec<DirectoryEntry>, FsError> {
        if mask == Attributes::VOLUME {
            return Ok(Vec::new());
        }

        let canonical = self.canonicalize(pattern)?;
        let (dir, name) = split_last_component(&canonical);
        if name.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(device) = device_name(name) {
            return Ok(vec![DirectoryEntry {
                short_name: device.to_string(),
                long_name: device.to_string(),
                size: 0,
                stamp: DosDateTime::default(),
                attributes: Attributes::DEVICE,
            }]);
        }

        let dir = self.locate(dir)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let wildcard =
            WildcardPattern::new(name).map_err(|_| FsError::IllegalPath(pattern.to_string()))?;
        let short_options = MatchOptions {
            long_names: false,
            expand_dot: false,
        };
        let long_options = MatchOptions {
            long_names: true,
            expand_dot: false,
        };
        let matches = |entry: &DirectoryEntry| {
            wildcard.matches(&entry.short_name, short_options)
                || (self.long_names && wildcard.matches(&entry.long_name, long_options))
        };
        let allowed = |entry: &DirectoryEntry| {
            mask.contains(
                entry.attributes & (Attributes::HIDDEN | Attributes::SYSTEM | Attributes::DIRECTORY),
            )
        };

        let mut found = Vec::new();

        if let Some(metadata) = dir.metadata.as_ref().filter(|_| !dir.is_root()) {
            for dot in [".", ".."] {
                let entry = self.make_entry(dot, dot, &dir.host, metadata);
                if allowed(&entry) && matches(&entry) {
                    found.push(entry);
                }
            }
        }

        for child in Self::list_dir(&dir.host)? {
            let entry = self.make_entry(&child.short, &child.long, &child.path, &child.metadata);
            if allowed(&entry) && matches(&entry) {
                log::trace!("{pattern} matched {}", entry.long_name);
                found.push(entry);
            }
        }

        Ok(found)
    }

    fn register(&mut self, file: OpenFile) -> Handle {
        while self.handles.contains_key(&self.next_handle) {
            self.next_handle = self.next_handle.checked_add(1).unwrap_or(FIRST_HANDLE);
        }
        let handle = self.next_handle;
        self.next_handle = self.next_handle.checked_add(1).unwrap_or(FIRST_HANDLE);
        self.handles.insert(handle, file);
        Handle(handle)
    }

    fn open(&mut self, handle: Handle) -> Result<&mut OpenFile, FsError> {
        self.handles
            .get_mut(&handle.0)
            .ok_or(FsError::InvalidHandle(handle.0))
    }
}

impl FileSystem for HostFileSystem {
    fn long_names(&self) -> bool {
        self.long_names
    }

    fn set_long_names(&mut self, enabled: bool) {
        self.long_names = enabled;
    }

    fn default_drive(&self) -> char {
        self.default_drive
    }

    fn set_default_drive(&mut self, drive: char) -> Result<(), FsError> {
        let drive = drive.to_ascii_uppercase();
        self.drive(drive)?;
        self.default_drive = drive;
        Ok(())
    }

    fn current_dir(&self, drive: char) -> Result<String, FsError> {
        let state = self.drive(drive)?;
        Ok(format!(
            "{}:\\{}",
            drive.to_ascii_uppercase(),
            state.current.join("\\")
        ))
    }

    fn change_dir(&mut self, path: &str) -> Result<(), FsError> {
        let location = self.locate(path)?;
        if !location.is_dir() {
            return Err(FsError::NotFound(path.to_string()));
        }

        log::debug!("Changing {}: to {}", location.drive, location.long_parts.join("\\"));
        if let Some(state) = self.drives.get_mut(&location.drive) {
            state.current = location.long_parts;
        }
        Ok(())
    }

    fn make_dir(&mut self, path: &str) -> Result<(), FsError> {
        let location = self.locate(path)?;
        if location.metadata.is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        fs::create_dir(&location.host).map_err(|e| FsError::io(&location.host, e))
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), FsError> {
        let (location, metadata) = self.locate_existing(path)?;
        if !metadata.is_dir() || location.is_root() {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        let current = &self.drive(location.drive)?.current;
        let is_current = current.len() >= location.long_parts.len()
            && current
                .iter()
                .zip(&location.long_parts)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if is_current {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        let mut contents =
            fs::read_dir(&location.host).map_err(|e| FsError::io(&location.host, e))?;
        if contents.next().is_some() {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        fs::remove_dir(&location.host).map_err(|e| FsError::io(&location.host, e))?;
        self.overlay.remove(&location.host);
        Ok(())
    }

    fn volume_label(&self, drive: char) -> Result<String, FsError> {
        Ok(self.drive(drive)?.label.clone())
    }

    fn free_space(&self, drive: char) -> Result<u64, FsError> {
        self.drive(drive)?;
        Ok(FREE_SPACE)
    }

    fn canonicalize(&self, raw: &str) -> Result<String, FsError> {
        let (drive, parts) = self.split_path(raw)?;
        Ok(format!("{drive}:\\{}", parts.join("\\")))
    }

    fn to_short_path(&self, path: &str, want_long: bool) -> Result<String, FsError> {
        let location = self.locate(path)?;
        let parts = if want_long {
            location.long_parts
        } else {
            location.short_parts
        };
        Ok(format!("{}:\\{}", location.drive, parts.join("\\")))
    }

    fn find_first(&mut self, pattern: &str, mask: Attributes) -> bool {
        self.cursor = SearchCursor::default();
        match self.search(pattern, mask) {
            Ok(entries) => {
                log::debug!("find_first {pattern}: {} match(es)", entries.len());
                self.cursor = SearchCursor::new(entries);
                !self.cursor.is_empty()
            }
            Err(e) => {
                log::debug!("find_first {pattern}: {e}");
                false
            }
        }
    }

    fn find_next(&mut self) -> bool {
        self.cursor.advance()
    }

    fn result(&self) -> Option<&DirectoryEntry> {
        self.cursor.current()
    }

    fn take_cursor(&mut self) -> SearchCursor {
        std::mem::take(&mut self.cursor)
    }

    fn restore_cursor(&mut self, cursor: SearchCursor) {
        self.cursor = cursor;
    }

    fn attributes(&self, path: &str) -> Result<Attributes, FsError> {
        if device_name(path).is_some() {
            return Ok(Attributes::DEVICE);
        }
        let (location, metadata) = self.locate_existing(path)?;
        Ok(self.host_attributes(&location.host, &metadata))
    }

    fn set_attributes(&mut self, path: &str, attributes: Attributes) -> Result<(), FsError> {
        let (location, metadata) = self.locate_existing(path)?;
        let mut stored =
            attributes & !(Attributes::DIRECTORY | Attributes::VOLUME | Attributes::DEVICE);
        if metadata.is_dir() {
            stored |= Attributes::DIRECTORY;
        }
        log::debug!("Attributes of {} set to {stored:?}", location.host.display());
        self.overlay.insert(location.host, stored);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FsError> {
        let (source, _) = self.locate_existing(from)?;
        if source.is_root() {
            return Err(FsError::AccessDenied(from.to_string()));
        }

        let target = self.locate(to)?;
        let target_host = if target.metadata.is_some() {
            if target.host != source.host {
                return Err(FsError::AlreadyExists(to.to_string()));
            }
            // same entry, only the case of the name changes
            let (_, typed) = self.split_path(to)?;
            match typed.last() {
                Some(name) => source.host.with_file_name(name),
                None => return Err(FsError::AccessDenied(to.to_string())),
            }
        } else {
            target.host
        };

        log::debug!(
            "Renaming {} -> {}",
            source.host.display(),
            target_host.display()
        );
        fs::rename(&source.host, &target_host).map_err(|e| FsError::io(&source.host, e))?;

        if let Some(attributes) = self.overlay.remove(&source.host) {
            self.overlay.insert(target_host, attributes);
        }
        Ok(())
    }

    fn unlink(&mut self, path: &str) -> Result<(), FsError> {
        if device_name(path).is_some() {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        let (location, metadata) = self.locate_existing(path)?;
        if metadata.is_dir()
            || self
                .host_attributes(&location.host, &metadata)
                .contains(Attributes::READ_ONLY)
        {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        log::debug!("Deleting {}", location.host.display());
        fs::remove_file(&location.host).map_err(|e| FsError::io(&location.host, e))?;
        self.overlay.remove(&location.host);
        Ok(())
    }

    fn create_file(&mut self, path: &str) -> Result<Handle, FsError> {
        if device_name(path).is_some() {
            return Ok(self.register(OpenFile::Null));
        }

        let location = self.locate(path)?;
        let blocked = location.metadata.as_ref().is_some_and(|metadata| {
            metadata.is_dir()
                || self
                    .host_attributes(&location.host, metadata)
                    .contains(Attributes::READ_ONLY)
        });
        if blocked {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        let file = File::create(&location.host).map_err(|e| FsError::io(&location.host, e))?;
        Ok(self.register(OpenFile::Host {
            file,
            path: location.host,
        }))
    }

    fn open_file(&mut self, path: &str, mode: OpenMode) -> Result<Handle, FsError> {
        if device_name(path).is_some() {
            return Ok(self.register(OpenFile::Null));
        }

        let (location, metadata) = self.locate_existing(path)?;
        if metadata.is_dir() {
            return Err(FsError::AccessDenied(path.to_string()));
        }
        let writable = mode == OpenMode::ReadWrite;
        if writable
            && self
                .host_attributes(&location.host, &metadata)
                .contains(Attributes::READ_ONLY)
        {
            return Err(FsError::AccessDenied(path.to_string()));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(&location.host)
            .map_err(|e| FsError::io(&location.host, e))?;
        Ok(self.register(OpenFile::Host {
            file,
            path: location.host,
        }))
    }

    fn close_file(&mut self, handle: Handle) -> Result<(), FsError> {
        self.handles
            .remove(&handle.0)
            .map(drop)
            .ok_or(FsError::InvalidHandle(handle.0))
    }

    fn read_bytes(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize, FsError> {
        match self.open(handle)? {
            OpenFile::Host { file, path } => file.read(buf).map_err(|e| FsError::io(&*path, e)),
            OpenFile::Null => Ok(0),
        }
    }

    fn write_bytes(&mut self, handle: Handle, data: &[u8]) -> Result<usize, FsError> {
        match self.open(handle)? {
            OpenFile::Host { file, path } => file
                .write_all(data)
                .map(|()| data.len())
                .map_err(|e| FsError::io(&*path, e)),
            OpenFile::Null => Ok(data.len()),
        }
    }

    fn seek_to_end(&mut self, handle: Handle) -> Result<u64, FsError> {
        match self.open(handle)? {
            OpenFile::Host { file, path } => file
                .seek(SeekFrom::End(0))
                .map_err(|e| FsError::io(&*path, e)),
            OpenFile::Null => Ok(0),
        }
    }

    fn file_time(&self, handle: Handle) -> Result<DosDateTime, FsError> {
        match self
            .handles
            .get(&handle.0)
            .ok_or(FsError::InvalidHandle(handle.0))?
        {
            OpenFile::Host { file, path } => {
                let modified = file
                    .metadata()
                    .and_then(|m| m.modified())
                    .map_err(|e| FsError::io(path, e))?;
                Ok(DosDateTime::from_system_time(modified))
            }
            OpenFile::Null => Ok(DosDateTime::default()),
        }
    }

    fn set_file_time(&mut self, handle: Handle, stamp: DosDateTime) -> Result<(), FsError> {
        match self.open(handle)? {
            OpenFile::Host { file, path } => {
                let Some(time) = stamp.to_system_time() else {
                    log::warn!("Cannot apply stamp {stamp:?} to {}", path.display());
                    return Ok(());
                };
                file.flush().map_err(|e| FsError::io(&*path, e))?;
                file.set_modified(time).map_err(|e| FsError::io(&*path, e))
            }
            OpenFile::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mounted() -> (TempDir, HostFileSystem) {
        let temp = TempDir::new().unwrap();
        let mut fs = HostFileSystem::new();
        fs.mount('c', temp.path()).unwrap();
        (temp, fs)
    }

    fn names(fs: &mut HostFileSystem, pattern: &str, mask: Attributes) -> Vec<String> {
        let mut out = Vec::new();
        if fs.find_first(pattern, mask) {
            loop {
                out.push(fs.result().unwrap().long_name.clone());
                if !fs.find_next() {
                    break;
                }
            }
        }
        out
    }

    #[test]
    fn test_canonicalize_relative_and_absolute() {
        let (temp, mut fs) = mounted();
        fs::create_dir_all(temp.path().join("dir").join("sub")).unwrap();
        fs.change_dir("dir\\sub").unwrap();

        assert_eq!(fs.current_dir('C').unwrap(), "C:\\dir\\sub");
        assert_eq!(fs.canonicalize("file.txt").unwrap(), "C:\\dir\\sub\\file.txt");
        assert_eq!(fs.canonicalize("..\\x").unwrap(), "C:\\dir\\x");
        assert_eq!(fs.canonicalize("c:/a/./b").unwrap(), "C:\\a\\b");
        assert_eq!(fs.canonicalize("\\").unwrap(), "C:\\");
        assert!(matches!(fs.canonicalize("Q:\\x"), Err(FsError::InvalidDrive('Q'))));
        assert!(matches!(fs.canonicalize("a|b"), Err(FsError::IllegalPath(_))));
    }

    #[test]
    fn test_short_mode_upper_cases() {
        let (_temp, mut fs) = mounted();
        fs.set_long_names(false);
        assert_eq!(fs.canonicalize("abc.txt").unwrap(), "C:\\ABC.TXT");
    }

    #[test]
    fn test_find_lists_dot_entries_then_sorted_names() {
        let (temp, mut fs) = mounted();
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.txt"), b"bb").unwrap();
        fs::write(sub.join("A.txt"), b"a").unwrap();
        fs::create_dir(sub.join("inner")).unwrap();

        assert_eq!(
            names(&mut fs, "sub\\*.*", Attributes::ALL_BUT_VOLUME),
            vec![".", "..", "A.txt", "b.txt", "inner"]
        );
        assert_eq!(
            names(&mut fs, "sub\\*.*", Attributes::ARCHIVE),
            vec!["A.txt", "b.txt"]
        );
        assert_eq!(names(&mut fs, "sub\\?.TXT", Attributes::ARCHIVE), vec!["A.txt", "b.txt"]);
        assert!(names(&mut fs, "*.*", Attributes::ALL_BUT_VOLUME) == vec!["sub"]);
    }

    #[test]
    fn test_hidden_entries_need_mask_bit() {
        let (temp, mut fs) = mounted();
        fs::write(temp.path().join("secret.txt"), b"x").unwrap();
        fs::write(temp.path().join("plain.txt"), b"x").unwrap();
        fs.set_attributes("secret.txt", Attributes::HIDDEN).unwrap();

        assert_eq!(names(&mut fs, "*.txt", Attributes::ARCHIVE), vec!["plain.txt"]);
        assert_eq!(
            names(&mut fs, "*.txt", Attributes::ALL_BUT_VOLUME),
            vec!["plain.txt", "secret.txt"]
        );
    }

    #[test]
    fn test_short_alias_resolves_long_file() {
        let (temp, mut fs) = mounted();
        fs::write(temp.path().join("long file name.txt"), b"hello").unwrap();

        assert_eq!(
            fs.to_short_path("long file name.txt", false).unwrap(),
            "C:\\LONGFI~1.TXT"
        );
        assert_eq!(
            fs.to_short_path("longfi~1.txt", true).unwrap(),
            "C:\\long file name.txt"
        );

        let handle = fs.open_file("LONGFI~1.TXT", OpenMode::Read).unwrap();
        let mut buf = [0u8; 16];
        let n = fs.read_bytes(handle, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        fs.close_file(handle).unwrap();
        assert!(fs.close_file(handle).is_err());
    }

    #[test]
    fn test_unlink_refuses_read_only_and_directories() {
        let (temp, mut fs) = mounted();
        fs::write(temp.path().join("keep.txt"), b"x").unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        fs.set_attributes("keep.txt", Attributes::READ_ONLY).unwrap();

        assert!(matches!(fs.unlink("keep.txt"), Err(FsError::AccessDenied(_))));
        assert!(matches!(fs.unlink("dir"), Err(FsError::AccessDenied(_))));
        assert!(matches!(fs.unlink("missing.txt"), Err(FsError::NotFound(_))));

        fs.set_attributes("keep.txt", Attributes::ARCHIVE).unwrap();
        fs.unlink("keep.txt").unwrap();
        assert!(!temp.path().join("keep.txt").exists());
    }

    #[test]
    fn test_rename_carries_attributes_and_refuses_existing_target() {
        let (temp, mut fs) = mounted();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::write(temp.path().join("b.txt"), b"b").unwrap();
        fs.set_attributes("a.txt", Attributes::HIDDEN).unwrap();

        assert!(matches!(fs.rename("a.txt", "b.txt"), Err(FsError::AlreadyExists(_))));
        fs.rename("a.txt", "c.txt").unwrap();
        assert_eq!(fs.attributes("c.txt").unwrap(), Attributes::HIDDEN);
        assert!(temp.path().join("c.txt").exists());
    }

    #[test]
    fn test_write_append_and_stamp() {
        let (temp, mut fs) = mounted();
        let handle = fs.create_file("out.bin").unwrap();
        fs.write_bytes(handle, b"abc").unwrap();
        fs.close_file(handle).unwrap();

        let handle = fs.open_file("out.bin", OpenMode::ReadWrite).unwrap();
        assert_eq!(fs.seek_to_end(handle).unwrap(), 3);
        fs.write_bytes(handle, b"def").unwrap();
        let stamp = DosDateTime::new(2001, 2, 3, 4, 5, 6);
        fs.set_file_time(handle, stamp).unwrap();
        fs.close_file(handle).unwrap();

        assert_eq!(fs::read(temp.path().join("out.bin")).unwrap(), b"abcdef");
        assert!(fs.find_first("out.bin", Attributes::ARCHIVE));
        assert_eq!(fs.result().unwrap().stamp, stamp);
        assert_eq!(fs.result().unwrap().size, 6);
    }

    #[test]
    fn test_nul_device_swallows_writes() {
        let (_temp, mut fs) = mounted();
        assert!(fs.is_device("nul"));
        assert_eq!(fs.attributes("NUL").unwrap(), Attributes::DEVICE);
        let handle = fs.create_file("NUL").unwrap();
        assert_eq!(fs.write_bytes(handle, b"gone").unwrap(), 4);
        let mut buf = [0u8; 4];
        assert_eq!(fs.read_bytes(handle, &mut buf).unwrap(), 0);

        assert!(fs.find_first("C:\\con", Attributes::FILES_ONLY));
        let entry = fs.result().unwrap();
        assert_eq!(entry.short_name, "CON");
        assert_eq!(entry.attributes, Attributes::DEVICE);
        assert!(!fs.find_next());
    }

    #[test]
    fn test_remove_dir_rules() {
        let (temp, mut fs) = mounted();
        fs.make_dir("full").unwrap();
        fs.make_dir("empty").unwrap();
        assert!(matches!(fs.make_dir("empty"), Err(FsError::AlreadyExists(_))));
        fs::write(temp.path().join("full").join("x"), b"x").unwrap();

        assert!(matches!(fs.remove_dir("full"), Err(FsError::AccessDenied(_))));
        fs.change_dir("empty").unwrap();
        assert!(matches!(fs.remove_dir("\\empty"), Err(FsError::AccessDenied(_))));
        fs.change_dir("..").unwrap();
        fs.remove_dir("empty").unwrap();
        assert!(!temp.path().join("empty").exists());
    }

    #[test]
    fn test_cursor_take_and_restore() {
        let (temp, mut fs) = mounted();
        fs::write(temp.path().join("one.txt"), b"1").unwrap();
        fs::write(temp.path().join("two.txt"), b"2").unwrap();

        assert!(fs.find_first("*.txt", Attributes::ARCHIVE));
        let saved = fs.take_cursor();
        assert!(fs.result().is_none());
        assert!(fs.find_first("two.txt", Attributes::ARCHIVE));
        fs.restore_cursor(saved);
        assert_eq!(fs.result().unwrap().long_name, "one.txt");
        assert!(fs.find_next());
        assert_eq!(fs.result().unwrap().long_name, "two.txt");
    }

    #[test]
    fn test_mount_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let mut fs = HostFileSystem::new();
        assert!(fs.mount('D', temp.path().join("nope")).is_err());
        fs.mount('d', temp.path()).unwrap();
        assert_eq!(fs.default_drive(), 'D');
        assert_eq!(fs.free_space('D').unwrap(), 100 * 1024 * 1024);
        assert!(fs.current_dir('E').is_err());
    }
}
