//! Built-in command engine for dosshell.
//!
//! This crate interprets DOS command lines against a [`dosshell_fs::FileSystem`]:
//!
//! * The file commands `DIR`, `COPY`, `DEL` and `REN`, with wildcard
//!   matching, attribute filters, sorting and destination templates
//! * `IF`, `GOTO`, `CALL` and `SHIFT` over running batch files
//! * The yes/no/all confirmation prompt and the `DIR /P` pager
//! * Command dispatch with `/?` help and the property-store fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use dosshell_commands::{Shell, TermConsole};
//! use dosshell_config::ShellConfig;
//!
//! let mut shell = Shell::from_config(
//!     &ShellConfig::default(),
//!     &[('C', "/tmp/dos".into())],
//!     Box::new(TermConsole::new()),
//! )?;
//! shell.execute("dir /w *.txt");
//! shell.run_interactive();
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod batch;
mod builtins;
mod collect;
mod console;
mod context;
mod control;
mod copy;
mod delete;
mod dir;
mod directories;
mod dispatch;
mod error;
mod prompt;
mod rename;
mod shell;
mod stream;
mod switches;

pub use batch::BatchFile;
pub use collect::{AttributeFilter, EntryList, Pager, SortKey, SortOrder, wait_for_key};
pub use console::{CTRL_C, Console, ENTER, EOF_MARKER, ScriptedConsole, TermConsole};
pub use context::{CommandScope, Environment, ShellContext};
pub use control::{Condition, IfStatement, parse_if};
pub use copy::{CopyPlan, CopySource};
pub use dir::format_number;
pub use dispatch::{
    COMMAND_REGISTRY, CommandDefinition, Handler, Tokenized, execute_line, lookup, tokenize,
};
pub use error::ShellError;
pub use prompt::{Answer, PromptKind, PromptState, Tentative, confirm};
pub use shell::Shell;
pub use switches::{reject_remaining, scan_bool, scan_remain, strip_arg};
