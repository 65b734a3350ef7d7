//! `DIR`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::VecDeque;
use std::fmt::Display;

use dosshell_fs::{Attributes, DirectoryEntry};
use dosshell_pattern::{append_all_files, ensure_extension, expand_dot, has_wildcards, split_last_component};

use crate::collect::{AttributeFilter, EntryList, Pager, SortKey, SortOrder};
use crate::context::ShellContext;
use crate::error::ShellError;
use crate::switches::{reject_remaining, scan_bool};

/// Entries per row in wide mode.
const WIDE_COLUMNS: usize = 5;

/// `1234567` as `1,234,567`.
#[must_use]
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

const ATTRIBUTE_SWITCHES: [(char, Attributes); 5] = [
    ('D', Attributes::DIRECTORY),
    ('S', Attributes::SYSTEM),
    ('H', Attributes::HIDDEN),
    ('R', Attributes::READ_ONLY),
    ('A', Attributes::ARCHIVE),
];

/// Sort switches in the order they take precedence.
const SORT_SWITCHES: [(char, SortKey); 5] = [
    ('N', SortKey::Name),
    ('E', SortKey::Extension),
    ('D', SortKey::Date),
    ('S', SortKey::Size),
    ('G', SortKey::Group),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DirOptions {
    wide: bool,
    paged: bool,
    short_only: bool,
    recursive: bool,
    bare: bool,
    filter: AttributeFilter,
    order: SortOrder,
}

impl DirOptions {
    /// Take every `DIR` switch out of `args`.
    fn scan(args: &mut String) -> Self {
        let mut options = Self::default();

        scan_bool(args, "4");
        options.wide = scan_bool(args, "W");
        options.paged = scan_bool(args, "P");
        if scan_bool(args, "WP") | scan_bool(args, "PW") {
            options.wide = true;
            options.paged = true;
        }
        if scan_bool(args, "-W") {
            options.wide = false;
        }
        if scan_bool(args, "-P") {
            options.paged = false;
        }
        options.short_only = scan_bool(args, "Z") && !scan_bool(args, "-Z");
        options.recursive = scan_bool(args, "S") && !scan_bool(args, "-S");
        options.bare = scan_bool(args, "B") && !scan_bool(args, "-B");

        if scan_bool(args, "A") {
            options.filter.show_all();
        }
        for (letter, attribute) in ATTRIBUTE_SWITCHES {
            if scan_bool(args, &format!("A{letter}")) | scan_bool(args, &format!("A:{letter}")) {
                options.filter.require(attribute);
            }
            if scan_bool(args, &format!("A-{letter}")) {
                options.filter.exclude(attribute);
            }
        }
        if scan_bool(args, "-A") {
            options.filter.clear();
        }

        let mut keys = Vec::new();
        for (letter, key) in SORT_SWITCHES {
            if scan_bool(args, &format!("O{letter}")) | scan_bool(args, &format!("O:{letter}")) {
                keys.push(key);
            }
            if scan_bool(args, &format!("O-{letter}")) {
                keys.push(key);
                options.order.reverse = true;
            }
        }
        if scan_bool(args, "O") | scan_bool(args, "OGN") {
            keys.push(SortKey::GroupName);
        }
        options.order.key = keys.first().copied();
        if scan_bool(args, "-O") {
            options.order = SortOrder::default();
        }

        options
    }

    /// Whether long names are shown.
    const fn long_display(&self, long_names: bool) -> bool {
        long_names && !self.short_only
    }
}

/// Running output state of one `DIR`.
struct Listing {
    options: DirOptions,
    long_display: bool,
    pager: Pager,
    files: u32,
    dirs: u32,
    bytes: u64,
}

impl Listing {
    fn emit(&mut self, ctx: &mut ShellContext, text: &str) -> Result<(), ShellError> {
        ctx.write(text);
        self.pager.line(ctx.console.as_mut())
    }

    fn emit_message(
        &mut self,
        ctx: &mut ShellContext,
        key: &str,
        args: &[&dyn Display],
    ) -> Result<(), ShellError> {
        let text = ctx.messages.format(key, args);
        self.emit(ctx, &text)
    }

    /// The directory part of `pattern` the way the header shows it.
    fn header_path(&self, ctx: &ShellContext, dir: &str) -> Result<String, ShellError> {
        ctx.fs
            .to_short_path(dir, self.long_display)
            .map_err(|_| ShellError::IllegalPath)
    }

    fn entry_line(&self, entry: &DirectoryEntry) -> String {
        let (base, ext) = if entry.short_name.starts_with('.') {
            (entry.short_name.as_str(), "")
        } else {
            entry
                .short_name
                .split_once('.')
                .unwrap_or((entry.short_name.as_str(), ""))
        };
        let size = if entry.is_directory() {
            format!("{:<16}", "<DIR>")
        } else {
            format!("{:>16}", format_number(u64::from(entry.size)))
        };
        let long = if self.long_display {
            entry.long_name.as_str()
        } else {
            ""
        };
        let stamp = entry.stamp;

        format!(
            "{base:<8} {ext:<3}   {size} {:02}-{:02}-{:04} {:>2}:{:02} {long}\n",
            stamp.day(),
            stamp.month(),
            stamp.year(),
            stamp.hour(),
            stamp.minute(),
        )
    }

    fn wide_cell(entry: &DirectoryEntry) -> String {
        if entry.is_directory() {
            format!("{:<16}", format!("[{}]", entry.short_name))
        } else {
            format!("{:<16}", entry.short_name)
        }
    }

    /// List one directory. Returns the subdirectory patterns to visit next
    /// when recursing.
    fn list_directory(
        &mut self,
        ctx: &mut ShellContext,
        pattern: &str,
    ) -> Result<Vec<String>, ShellError> {
        let full = match ctx.fs.canonicalize(pattern) {
            Ok(full) => full,
            Err(e) => {
                log::debug!("DIR {pattern}: {e}");
                ctx.report(&ShellError::IllegalPath);
                return Ok(Vec::new());
            }
        };
        let (dir, file_pattern) = split_last_component(&full);
        let dir = dir.to_string();
        let file_pattern = file_pattern.to_string();
        let header = self.header_path(ctx, &dir)?;

        if !self.options.bare && !self.options.recursive {
            self.emit_message(ctx, "SHELL_CMD_DIR_INTRO", &[&header])?;
        }

        let mut entries = EntryList::collect(
            ctx.fs.as_mut(),
            &full,
            Attributes::ALL_BUT_VOLUME,
            &self.options.filter,
        );
        entries.sort(self.options.order, self.long_display);

        let mut dir_files = 0u32;
        let mut dir_bytes = 0u64;
        let mut column = 0usize;

        for (idx, entry) in entries.iter().enumerate() {
            if self.options.bare {
                if !entry.is_dot_entry() {
                    let text = format!("{}\n", entry.name(self.long_display));
                    self.emit(ctx, &text)?;
                }
                continue;
            }

            if idx == 0 && self.options.recursive {
                ctx.write("\n");
                self.emit_message(ctx, "SHELL_CMD_DIR_INTRO", &[&header])?;
            }

            if self.options.wide {
                ctx.write(&Self::wide_cell(entry));
                column += 1;
                if column == WIDE_COLUMNS {
                    column = 0;
                    self.emit(ctx, "\n")?;
                }
            } else {
                let line = self.entry_line(entry);
                self.emit(ctx, &line)?;
            }

            if entry.is_directory() {
                self.dirs += 1;
            } else {
                self.files += 1;
                self.bytes += u64::from(entry.size);
                dir_files += 1;
                dir_bytes += u64::from(entry.size);
            }
        }

        if column > 0 {
            self.emit(ctx, "\n")?;
        }

        let found = !entries.is_empty();
        if !found && !self.options.bare && !self.options.recursive {
            self.emit_message(ctx, "SHELL_CMD_FILE_NOT_FOUND", &[&full])?;
        }

        if !self.options.recursive {
            return Ok(Vec::new());
        }

        if found && !self.options.bare {
            let bytes = format_number(dir_bytes);
            self.emit_message(ctx, "SHELL_CMD_DIR_BYTES_USED", &[&dir_files, &bytes])?;
        }

        let mut everything = AttributeFilter::default();
        everything.show_all();
        let children = EntryList::collect(
            ctx.fs.as_mut(),
            &format!("{dir}*.*"),
            Attributes::ALL_BUT_VOLUME,
            &everything,
        );
        Ok(children
            .iter()
            .filter(|child| child.is_directory() && !child.is_dot_entry())
            .map(|child| format!("{dir}{}\\{file_pattern}", child.short_name))
            .collect())
    }
}

/// Normalise the typed argument into the first search pattern.
fn search_pattern(ctx: &ShellContext, args: &str, long_display: bool) -> Result<String, ShellError> {
    let mut pattern = expand_dot(&append_all_files(args.trim()));
    if ctx.fs.is_device(&pattern) {
        return Err(ShellError::FileNotFound(pattern));
    }

    if !has_wildcards(&pattern) {
        let short = ctx
            .fs
            .to_short_path(&pattern, false)
            .map_err(|_| ShellError::IllegalPath)?;
        if ctx
            .fs
            .attributes(&short)
            .is_ok_and(|a| a.contains(Attributes::DIRECTORY))
        {
            pattern = format!("{}\\*.*", short.trim_end_matches('\\'));
        }
    }

    let short = ctx
        .fs
        .to_short_path(&pattern, false)
        .map_err(|_| ShellError::IllegalPath)?;
    if long_display && short.contains('*') {
        Ok(short)
    } else {
        Ok(ensure_extension(&short))
    }
}

/// `DIR [pattern] [/W] [/P] [/B] [/S] [/Z] [/A[[:]attrs]] [/O[[:]order]]`
///
/// The value of `DIRCMD` is appended to the arguments.
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] for an unknown switch
/// * [`ShellError::IllegalPath`] if the pattern cannot be resolved
/// * [`ShellError::FileNotFound`] for a device name
/// * [`ShellError::Cancelled`] on Ctrl-C at a page break
pub fn cmd_dir(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut args = match ctx.env.get("DIRCMD") {
        Some(dircmd) => format!("{args} {dircmd}"),
        None => args.to_string(),
    };

    let options = DirOptions::scan(&mut args);
    reject_remaining(&args)?;
    log::debug!("DIR {} {options:?}", args.trim());

    let long_display = options.long_display(ctx.long_names());
    let pattern = search_pattern(ctx, &args, long_display)?;
    let full = ctx
        .fs
        .canonicalize(&pattern)
        .map_err(|_| ShellError::IllegalPath)?;
    let drive = full.chars().next().unwrap_or_else(|| ctx.fs.default_drive());

    let prompt = ctx.messages.get("SHELL_CMD_PAUSE").to_string();
    let rows = ctx.console.rows();
    let mut listing = Listing {
        pager: Pager::new(options.paged, rows, &prompt),
        options,
        long_display,
        files: 0,
        dirs: 0,
        bytes: 0,
    };

    let bare = listing.options.bare;
    let recursive = listing.options.recursive;

    if !bare {
        if let Ok(label) = ctx.fs.volume_label(drive) {
            listing.emit_message(ctx, "SHELL_CMD_DIR_VOLUME", &[&drive, &label])?;
        }
    }

    let mut pending = VecDeque::from([pattern.clone()]);
    while let Some(current) = pending.pop_front() {
        let children = listing.list_directory(ctx, &current)?;
        for child in children.into_iter().rev() {
            pending.push_front(child);
        }
    }

    if bare {
        return Ok(());
    }

    if recursive {
        listing.emit(ctx, "\n")?;
        if listing.files == 0 && listing.dirs == 0 {
            listing.emit_message(ctx, "SHELL_CMD_FILE_NOT_FOUND", &[&pattern])?;
        } else {
            listing.emit_message(ctx, "SHELL_CMD_DIR_FILES_LISTED", &[])?;
        }
    }

    let used = format_number(listing.bytes);
    let files = listing.files;
    listing.emit_message(ctx, "SHELL_CMD_DIR_BYTES_USED", &[&files, &used])?;

    let free = format_number(ctx.fs.free_space(drive).unwrap_or(0));
    let dirs = listing.dirs;
    listing.emit_message(ctx, "SHELL_CMD_DIR_BYTES_FREE", &[&dirs, &free])?;
    Ok(())
}
