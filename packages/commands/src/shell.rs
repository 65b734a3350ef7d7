//! The interpreter loop.
//!
//! [`Shell`] owns a [`ShellContext`] and feeds it lines, either typed at the
//! console or read from running batch files. A command that starts a batch
//! only pushes it; the shell then runs the innermost batch line by line
//! until every batch has finished.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use dosshell_config::{MessageCatalog, PropertyStore, ShellConfig};
use dosshell_fs::{FileSystem, HostFileSystem};

use crate::console::Console;
use crate::context::ShellContext;
use crate::dispatch::{execute_line, start_batch};
use crate::error::ShellError;

/// A command interpreter over one context.
pub struct Shell {
    ctx: ShellContext,
}

impl Shell {
    #[must_use]
    pub const fn new(ctx: ShellContext) -> Self {
        Self { ctx }
    }

    /// Build a shell over host directories.
    ///
    /// # Arguments
    ///
    /// * `config` - Long-name mode, echo default, environment, messages and properties
    /// * `mounts` - Drive letters and the host directories behind them; the first is the default drive
    /// * `console` - Where input comes from and output goes
    ///
    /// # Errors
    ///
    /// * If a drive letter is invalid or its host directory does not exist
    pub fn from_config(
        config: &ShellConfig,
        mounts: &[(char, PathBuf)],
        console: Box<dyn Console>,
    ) -> Result<Self, ShellError> {
        let mut fs = HostFileSystem::new();
        fs.set_long_names(config.long_names);
        for (drive, root) in mounts {
            fs.mount(*drive, root)?;
        }

        let mut ctx = ShellContext::new(
            Box::new(fs),
            console,
            MessageCatalog::new(config.messages.clone()),
            PropertyStore::new(config.properties.clone()),
        );
        ctx.echo = config.echo;
        for (name, value) in &config.environment {
            ctx.env.set(name, value);
        }

        log::debug!(
            "Shell ready: {} drive(s), long names {}",
            mounts.len(),
            config.long_names
        );
        Ok(Self::new(ctx))
    }

    #[must_use]
    pub const fn context(&self) -> &ShellContext {
        &self.ctx
    }

    pub const fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.ctx
    }

    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.ctx.exit_requested
    }

    #[must_use]
    pub const fn errorlevel(&self) -> u8 {
        self.ctx.errorlevel
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        self.ctx.prompt()
    }

    /// Run one line, then any batch file it started.
    pub fn execute(&mut self, line: &str) {
        execute_line(&mut self.ctx, line);
        self.drain_batches();
    }

    /// Run a batch file to completion.
    ///
    /// # Arguments
    ///
    /// * `path` - The script, as a DOS path on a mounted drive
    /// * `args` - `%1` onwards
    ///
    /// # Errors
    ///
    /// * If the path cannot be resolved or the script cannot be read
    pub fn run_batch(&mut self, path: &str, args: &[String]) -> Result<(), ShellError> {
        let full = self.ctx.fs.canonicalize(path)?;
        let mut batch_args = Vec::with_capacity(args.len() + 1);
        batch_args.push(path.to_string());
        batch_args.extend_from_slice(args);

        start_batch(&mut self.ctx, &full, batch_args)?;
        self.drain_batches();
        Ok(())
    }

    /// Read and run lines until `EXIT` or the end of input.
    pub fn run_interactive(&mut self) {
        while !self.ctx.exit_requested {
            let prompt = self.ctx.prompt();
            self.ctx.write(&prompt);
            let Some(line) = self.ctx.console.read_line() else {
                break;
            };
            self.execute(&line);
            if self.ctx.echo && !self.ctx.exit_requested {
                self.ctx.write("\n");
            }
        }
    }

    fn drain_batches(&mut self) {
        while !self.ctx.exit_requested {
            let Some(batch) = self.ctx.batch_mut() else {
                break;
            };
            let Some(line) = batch.read_line() else {
                if let Some(done) = self.ctx.batches.pop() {
                    log::debug!("Batch {} finished", done.path());
                    self.ctx.echo = done.saved_echo();
                }
                continue;
            };

            let line = match self.ctx.batch() {
                Some(batch) => batch.expand(&line, &self.ctx.env),
                None => line,
            };
            log::trace!("Batch line: {line}");

            let trimmed = line.trim();
            if self.ctx.echo && !trimmed.is_empty() && !trimmed.starts_with('@') {
                let echoed = format!("{}{trimmed}\n", self.ctx.prompt());
                self.ctx.write(&echoed);
            }
            execute_line(&mut self.ctx, &line);
        }
    }
}
