//! Interpreter state threaded through every command.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt::Display;
use std::ops::{Deref, DerefMut};

use dosshell_config::{MessageCatalog, PropertyStore};
use dosshell_fs::{FileSystem, SearchCursor};

use crate::batch::BatchFile;
use crate::console::Console;
use crate::error::ShellError;

/// Environment variables in definition order. Names are stored upper case
/// and looked up without regard to case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(String, String)>,
}

impl Environment {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a variable; an empty value removes it.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_uppercase();
        let existing = self.vars.iter().position(|(key, _)| *key == name);
        match (existing, value.is_empty()) {
            (Some(idx), true) => {
                self.vars.remove(idx);
            }
            (Some(idx), false) => self.vars[idx].1 = value.to_string(),
            (None, true) => {}
            (None, false) => self.vars.push((name, value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::default();
        for (name, value) in iter {
            env.set(name.as_ref(), value.as_ref());
        }
        env
    }
}

/// Everything a command can see or change.
pub struct ShellContext {
    pub fs: Box<dyn FileSystem>,
    pub console: Box<dyn Console>,
    pub messages: MessageCatalog,
    pub properties: PropertyStore,
    pub env: Environment,
    /// Exit code of the last program, read by `IF ERRORLEVEL`.
    pub errorlevel: u8,
    /// Whether batch lines are echoed.
    pub echo: bool,
    /// Running batch files, innermost last.
    pub batches: Vec<BatchFile>,
    /// Set while `CALL` runs its argument so a batch started from it is
    /// nested instead of replacing the caller.
    pub call: bool,
    pub exit_requested: bool,
}

impl ShellContext {
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        console: Box<dyn Console>,
        messages: MessageCatalog,
        properties: PropertyStore,
    ) -> Self {
        Self {
            fs,
            console,
            messages,
            properties,
            env: Environment::default(),
            errorlevel: 0,
            echo: true,
            batches: Vec::new(),
            call: false,
            exit_requested: false,
        }
    }

    pub fn write(&mut self, text: &str) {
        self.console.write(text);
    }

    /// Print a catalog message.
    pub fn write_message(&mut self, key: &str, args: &[&dyn Display]) {
        let text = self.messages.format(key, args);
        self.console.write(&text);
    }

    /// Print the message for an error.
    pub fn report(&mut self, err: &ShellError) {
        log::debug!("Command failed: {err}");
        let text = err.render(&self.messages);
        self.console.write(&text);
    }

    #[must_use]
    pub fn long_names(&self) -> bool {
        self.fs.long_names()
    }

    /// The innermost running batch file.
    #[must_use]
    pub fn batch(&self) -> Option<&BatchFile> {
        self.batches.last()
    }

    pub fn batch_mut(&mut self) -> Option<&mut BatchFile> {
        self.batches.last_mut()
    }

    /// The prompt shown before input and echoed batch lines, `C:\DIR>`.
    #[must_use]
    pub fn prompt(&self) -> String {
        let drive = self.fs.default_drive();
        let dir = self
            .fs
            .current_dir(drive)
            .unwrap_or_else(|_| format!("{drive}:\\"));
        format!("{dir}>")
    }
}

/// A command's hold on the context.
///
/// The search cursor is detached on entry and put back when the scope is
/// dropped, however the command ends, so a command that enumerates
/// (including one nested through `IF` or `CALL`) never disturbs an
/// enumeration its caller is in the middle of.
pub struct CommandScope<'a> {
    ctx: &'a mut ShellContext,
    saved: Option<SearchCursor>,
}

impl<'a> CommandScope<'a> {
    pub fn enter(ctx: &'a mut ShellContext) -> Self {
        let saved = ctx.fs.take_cursor();
        Self {
            ctx,
            saved: Some(saved),
        }
    }
}

impl Deref for CommandScope<'_> {
    type Target = ShellContext;

    fn deref(&self) -> &ShellContext {
        self.ctx
    }
}

impl DerefMut for CommandScope<'_> {
    fn deref_mut(&mut self) -> &mut ShellContext {
        self.ctx
    }
}

impl Drop for CommandScope<'_> {
    fn drop(&mut self) {
        if let Some(cursor) = self.saved.take() {
            self.ctx.fs.restore_cursor(cursor);
        }
    }
}
