//! Directory entry collection, filtering, sorting and paging.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::cmp::Ordering;

use dosshell_fs::{Attributes, DirectoryEntry, FileSystem};

use crate::console::{CTRL_C, Console};
use crate::error::ShellError;

/// Attribute include/exclude filter as set by `/A` switches.
///
/// Without any `/A` switch, hidden and system entries are left out, except
/// `..`. Any `/A` switch turns that default off; the required and excluded
/// bits then decide alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    required: Attributes,
    excluded: Attributes,
    explicit: bool,
}

impl AttributeFilter {
    /// Show everything (`/A`).
    pub const fn show_all(&mut self) {
        self.explicit = true;
    }

    /// Only entries carrying `attributes` (`/AD`, `/A:H`, ...).
    pub fn require(&mut self, attributes: Attributes) {
        self.explicit = true;
        self.required |= attributes;
        self.excluded -= attributes;
    }

    /// Only entries without `attributes` (`/A-D`, ...).
    pub fn exclude(&mut self, attributes: Attributes) {
        self.explicit = true;
        self.excluded |= attributes;
        self.required -= attributes;
    }

    /// Back to the default policy (`/-A`).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn accepts(&self, entry: &DirectoryEntry) -> bool {
        if !self.explicit {
            return entry.short_name == ".."
                || !entry
                    .attributes
                    .intersects(Attributes::HIDDEN | Attributes::SYSTEM);
        }
        entry.attributes.contains(self.required) && !entry.attributes.intersects(self.excluded)
    }
}

/// The key entries are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Extension,
    Size,
    Date,
    /// Directories before files, otherwise enumeration order.
    Group,
    /// Directories before files, each group by name.
    GroupName,
}

/// A sort key and a reverse flag.
///
/// Reversing only applies when a key is set; with no key the enumeration
/// order is kept as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    pub key: Option<SortKey>,
    pub reverse: bool,
}

/// Entries gathered from one enumeration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<DirectoryEntry>,
}

impl EntryList {
    #[must_use]
    pub const fn from_entries(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// Enumerate `pattern` and keep the entries `filter` accepts.
    ///
    /// # Arguments
    ///
    /// * `fs` - Filesystem whose search cursor is used
    /// * `pattern` - DOS search pattern such as `C:\DIR\*.TXT`
    /// * `mask` - Attribute mask handed to the enumerator
    /// * `filter` - Attribute filter applied to each result
    pub fn collect(
        fs: &mut dyn FileSystem,
        pattern: &str,
        mask: Attributes,
        filter: &AttributeFilter,
    ) -> Self {
        let mut entries = Vec::new();
        if fs.find_first(pattern, mask) {
            loop {
                if let Some(entry) = fs.result().filter(|entry| filter.accepts(entry)) {
                    log::trace!("Collected {}", entry.long_name);
                    entries.push(entry.clone());
                }
                if !fs.find_next() {
                    break;
                }
            }
        }
        log::debug!("Collected {} entries for {pattern}", entries.len());
        Self { entries }
    }

    /// Sort in place. The sort is stable, so entries that compare equal keep
    /// their enumeration order.
    pub fn sort(&mut self, order: SortOrder, long_names: bool) {
        let Some(key) = order.key else {
            if order.reverse {
                log::debug!("Reverse requested without a sort key; order unchanged");
            }
            return;
        };

        self.entries.sort_by(|a, b| compare(key, a, b, long_names));
        if order.reverse {
            self.entries.reverse();
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<DirectoryEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a DirectoryEntry;
    type IntoIter = std::slice::Iter<'a, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn compare_names(a: &DirectoryEntry, b: &DirectoryEntry, long_names: bool) -> Ordering {
    let a = a.name(long_names).to_ascii_uppercase();
    let b = b.name(long_names).to_ascii_uppercase();
    a.cmp(&b)
}

fn compare(key: SortKey, a: &DirectoryEntry, b: &DirectoryEntry, long_names: bool) -> Ordering {
    let directories_first = || b.is_directory().cmp(&a.is_directory());
    match key {
        SortKey::Name => compare_names(a, b, long_names),
        SortKey::Extension => a.extension().cmp(b.extension()),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Date => a.stamp.cmp(&b.stamp),
        SortKey::Group => directories_first(),
        SortKey::GroupName => {
            directories_first().then_with(|| compare_names(a, b, long_names))
        }
    }
}

/// Read one key for a page break or `PAUSE`.
///
/// A `0` byte starts an extended key whose second byte is read and
/// dropped.
///
/// # Errors
///
/// * [`ShellError::Cancelled`] on Ctrl-C
pub fn wait_for_key(console: &mut dyn Console) -> Result<(), ShellError> {
    match console.read_byte() {
        Some(CTRL_C) => Err(ShellError::Cancelled),
        Some(0) => {
            console.read_byte();
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Counts printed lines and pauses once a screen is full.
#[derive(Debug, Clone)]
pub struct Pager {
    enabled: bool,
    page_size: usize,
    lines: usize,
    prompt: String,
}

impl Pager {
    /// A pager for a console with `rows` rows. Pages leave two rows for the
    /// prompt; tiny screens fall back to 22 lines.
    #[must_use]
    pub fn new(enabled: bool, rows: usize, prompt: &str) -> Self {
        Self {
            enabled,
            page_size: if rows > 2 { rows - 2 } else { 22 },
            lines: 0,
            prompt: prompt.to_string(),
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Account for one printed line, pausing if the page is full.
    ///
    /// # Errors
    ///
    /// * [`ShellError::Cancelled`] if Ctrl-C is pressed at the pause
    pub fn line(&mut self, console: &mut dyn Console) -> Result<(), ShellError> {
        self.lines += 1;
        if !self.enabled || self.lines < self.page_size {
            return Ok(());
        }
        self.lines = 0;
        console.write(&self.prompt);
        wait_for_key(console)?;
        console.write("\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use dosshell_fs::{DosDateTime, HostFileSystem};
    use tempfile::TempDir;

    fn entry(name: &str, attributes: Attributes) -> DirectoryEntry {
        DirectoryEntry {
            short_name: name.to_ascii_uppercase(),
            long_name: name.to_string(),
            size: 0,
            stamp: DosDateTime::default(),
            attributes,
        }
    }

    fn names(list: &EntryList) -> Vec<&str> {
        list.iter().map(|e| e.long_name.as_str()).collect()
    }

    #[test]
    fn test_group_name_sort_and_reverse() {
        let entries = vec![
            entry("B", Attributes::DIRECTORY),
            entry("a.txt", Attributes::ARCHIVE),
            entry("A", Attributes::DIRECTORY),
        ];

        let mut list = EntryList::from_entries(entries.clone());
        list.sort(
            SortOrder {
                key: Some(SortKey::GroupName),
                reverse: false,
            },
            true,
        );
        assert_eq!(names(&list), vec!["A", "B", "a.txt"]);

        let mut list = EntryList::from_entries(entries);
        list.sort(
            SortOrder {
                key: Some(SortKey::GroupName),
                reverse: true,
            },
            true,
        );
        assert_eq!(names(&list), vec!["a.txt", "B", "A"]);
    }

    #[test]
    fn test_reverse_without_key_keeps_order() {
        let entries = vec![
            entry("z.txt", Attributes::ARCHIVE),
            entry("a.txt", Attributes::ARCHIVE),
        ];
        let mut list = EntryList::from_entries(entries);
        list.sort(
            SortOrder {
                key: None,
                reverse: true,
            },
            true,
        );
        assert_eq!(names(&list), vec!["z.txt", "a.txt"]);
    }

    #[test]
    fn test_group_sort_is_stable() {
        let mut list = EntryList::from_entries(vec![
            entry("f2", Attributes::ARCHIVE),
            entry("d2", Attributes::DIRECTORY),
            entry("f1", Attributes::ARCHIVE),
            entry("d1", Attributes::DIRECTORY),
        ]);
        list.sort(
            SortOrder {
                key: Some(SortKey::Group),
                reverse: false,
            },
            true,
        );
        assert_eq!(names(&list), vec!["d2", "d1", "f2", "f1"]);
    }

    #[test]
    fn test_size_and_date_sort() {
        let mut small = entry("small", Attributes::ARCHIVE);
        small.size = 1;
        small.stamp = DosDateTime::new(2020, 1, 1, 0, 0, 0);
        let mut big = entry("big", Attributes::ARCHIVE);
        big.size = 100;
        big.stamp = DosDateTime::new(1999, 1, 1, 0, 0, 0);

        let mut list = EntryList::from_entries(vec![big.clone(), small.clone()]);
        list.sort(
            SortOrder {
                key: Some(SortKey::Size),
                reverse: false,
            },
            true,
        );
        assert_eq!(names(&list), vec!["small", "big"]);

        list.sort(
            SortOrder {
                key: Some(SortKey::Date),
                reverse: false,
            },
            true,
        );
        assert_eq!(names(&list), vec!["big", "small"]);
    }

    #[test]
    fn test_default_filter_hides_hidden_but_keeps_parent() {
        let filter = AttributeFilter::default();
        assert!(filter.accepts(&entry("..", Attributes::DIRECTORY | Attributes::HIDDEN)));
        assert!(!filter.accepts(&entry("secret", Attributes::HIDDEN)));
        assert!(!filter.accepts(&entry("io.sys", Attributes::SYSTEM)));
        assert!(filter.accepts(&entry("plain", Attributes::ARCHIVE)));
    }

    #[test]
    fn test_explicit_filters_and_clear() {
        let mut filter = AttributeFilter::default();
        filter.require(Attributes::DIRECTORY);
        assert!(filter.accepts(&entry("dir", Attributes::DIRECTORY | Attributes::HIDDEN)));
        assert!(!filter.accepts(&entry("file", Attributes::ARCHIVE)));

        filter.exclude(Attributes::DIRECTORY);
        assert!(!filter.accepts(&entry("dir", Attributes::DIRECTORY)));
        assert!(filter.accepts(&entry("file", Attributes::HIDDEN)));

        filter.clear();
        assert_eq!(filter, AttributeFilter::default());
    }

    #[test]
    fn test_collect_from_host_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.txt"), "b").unwrap();
        std::fs::write(temp.path().join("a.txt"), "a").unwrap();
        std::fs::write(temp.path().join("c.doc"), "c").unwrap();
        let mut fs = HostFileSystem::new();
        fs.mount('C', temp.path()).unwrap();

        let list = EntryList::collect(
            &mut fs,
            "C:\\*.TXT",
            Attributes::ALL_BUT_VOLUME,
            &AttributeFilter::default(),
        );
        assert_eq!(names(&list), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_pager_pauses_each_page() {
        let probe = ScriptedConsole::new(b" x");
        let mut console = probe.clone();
        let mut pager = Pager::new(true, 4, "--more--");
        assert_eq!(pager.page_size(), 2);

        pager.line(&mut console).unwrap();
        assert_eq!(probe.output(), "");
        pager.line(&mut console).unwrap();
        assert_eq!(probe.take_output(), "--more--\n");
        assert_eq!(probe.remaining_input(), 1);
    }

    #[test]
    fn test_pager_ctrl_c_and_extended_keys() {
        let mut console = ScriptedConsole::new(&[CTRL_C]);
        let mut pager = Pager::new(true, 3, "");
        assert!(matches!(
            pager.line(&mut console),
            Err(ShellError::Cancelled)
        ));

        let probe = ScriptedConsole::new(&[0, 0x48, b'k']);
        let mut console = probe.clone();
        wait_for_key(&mut console).unwrap();
        assert_eq!(probe.remaining_input(), 1);
    }

    #[test]
    fn test_disabled_pager_never_reads() {
        let probe = ScriptedConsole::new(b"");
        let mut console = probe.clone();
        let mut pager = Pager::new(false, 3, "--more--");
        for _ in 0..10 {
            pager.line(&mut console).unwrap();
        }
        assert_eq!(probe.output(), "");
    }
}
