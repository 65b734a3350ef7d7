//! Batch file position tracking.
//!
//! A [`BatchFile`] holds the lines of a `.BAT` script, the line to run next
//! and the positional arguments `%0` to `%9`. `GOTO` moves the position to
//! a label, `SHIFT` moves the argument window.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::{FileSystem, OpenMode};

use crate::console::EOF_MARKER;
use crate::context::Environment;
use crate::error::ShellError;

/// A running batch script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    path: String,
    lines: Vec<String>,
    position: usize,
    args: Vec<String>,
    shift: usize,
    saved_echo: bool,
}

impl BatchFile {
    /// A batch over the given lines. `args[0]` is the name it was started
    /// by; the rest are its parameters.
    #[must_use]
    pub const fn new(path: String, lines: Vec<String>, args: Vec<String>, saved_echo: bool) -> Self {
        Self {
            path,
            lines,
            position: 0,
            args,
            shift: 0,
            saved_echo,
        }
    }

    /// Read a script from the filesystem. Reading stops at a `0x1A` byte.
    ///
    /// # Arguments
    ///
    /// * `fs` - Filesystem the script lives on
    /// * `path` - Fully qualified path of the script
    /// * `args` - `%0` followed by the parameters
    /// * `saved_echo` - Echo state to restore when the script ends
    ///
    /// # Errors
    ///
    /// * If the script cannot be opened or read
    pub fn load(
        fs: &mut dyn FileSystem,
        path: &str,
        args: Vec<String>,
        saved_echo: bool,
    ) -> Result<Self, ShellError> {
        let handle = fs.open_file(path, OpenMode::Read)?;
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        let read = loop {
            match fs.read_bytes(handle, &mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => data.extend_from_slice(&buf[..n]),
                Err(e) => break Err(e),
            }
        };
        fs.close_file(handle)?;
        read?;

        if let Some(end) = data.iter().position(|&b| b == EOF_MARKER) {
            data.truncate(end);
        }
        let lines: Vec<String> = String::from_utf8_lossy(&data)
            .lines()
            .map(str::to_string)
            .collect();

        log::debug!("Loaded batch {path}: {} line(s)", lines.len());
        Ok(Self::new(path.to_string(), lines, args, saved_echo))
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Echo state from before the script started.
    #[must_use]
    pub const fn saved_echo(&self) -> bool {
        self.saved_echo
    }

    /// The next line to run, skipping labels. `None` once the script ends.
    pub fn read_line(&mut self) -> Option<String> {
        while let Some(line) = self.lines.get(self.position) {
            self.position += 1;
            if !line.trim_start().starts_with(':') {
                return Some(line.clone());
            }
        }
        None
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// Continue after the line `:label`. Labels compare without case and end
    /// at the first whitespace. Returns `false` when there is no such label,
    /// leaving the position where it was.
    pub fn goto(&mut self, label: &str) -> bool {
        let found = self.lines.iter().position(|line| {
            line.trim_start()
                .strip_prefix(':')
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|name| name.eq_ignore_ascii_case(label))
        });
        match found {
            Some(idx) => {
                log::debug!("GOTO {label}: line {}", idx + 1);
                self.position = idx + 1;
                true
            }
            None => false,
        }
    }

    /// Move every positional argument down by one.
    pub fn shift(&mut self) {
        if self.shift < self.args.len() {
            self.shift += 1;
        }
    }

    /// `%n` after shifting.
    #[must_use]
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.args.get(self.shift + n).map(String::as_str)
    }

    /// Replace `%0`-`%9`, `%NAME%` and `%%` in a line. Unknown variables
    /// and missing arguments become empty; an unterminated `%` is kept.
    #[must_use]
    pub fn expand(&self, line: &str, env: &Environment) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(idx) = rest.find('%') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];
            match after.chars().next() {
                Some('%') => {
                    out.push('%');
                    rest = &after[1..];
                }
                Some(digit @ '0'..='9') => {
                    let n = usize::from(digit as u8 - b'0');
                    out.push_str(self.arg(n).unwrap_or(""));
                    rest = &after[1..];
                }
                Some(_) => {
                    if let Some(end) = after.find('%') {
                        out.push_str(env.get(&after[..end]).unwrap_or(""));
                        rest = &after[end + 1..];
                    } else {
                        out.push('%');
                        rest = after;
                    }
                }
                None => {
                    out.push('%');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}
