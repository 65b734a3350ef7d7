//! Command line tokenizing and dispatch.
//!
//! A line is split into a command name and the unparsed remainder. The name
//! is looked up in [`COMMAND_REGISTRY`]; names that are not built-ins fall
//! through to drive switching, `.BAT` execution and the property store, in
//! that order.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::Attributes;
use dosshell_pattern::split_last_component;

use crate::batch::BatchFile;
use crate::builtins::{cmd_choice, cmd_echo, cmd_exit, cmd_help, cmd_pause, cmd_rem, cmd_set, cmd_type};
use crate::context::{CommandScope, ShellContext};
use crate::control::{cmd_call, cmd_goto, cmd_if, cmd_shift};
use crate::copy::cmd_copy;
use crate::delete::cmd_delete;
use crate::dir::cmd_dir;
use crate::directories::{cmd_chdir, cmd_mkdir, cmd_rmdir};
use crate::error::ShellError;
use crate::rename::cmd_rename;
use crate::switches::{scan_bool, split_args};

/// A built-in command handler. It receives the argument text exactly as
/// typed after the command name.
pub type Handler = fn(&mut ShellContext, &str) -> Result<(), ShellError>;

/// One built-in command.
#[derive(Debug)]
pub struct CommandDefinition {
    pub name: &'static str,
    /// Left out of the short `HELP` listing.
    pub hidden: bool,
    /// Message key of the one-line help; `<key>_LONG` holds the usage text.
    pub help: &'static str,
    /// Whether the dispatcher answers `/?` anywhere in the arguments.
    pub scan_help: bool,
    pub handler: Handler,
}

const fn command(name: &'static str, hidden: bool, help: &'static str, handler: Handler) -> CommandDefinition {
    CommandDefinition {
        name,
        hidden,
        help,
        scan_help: true,
        handler,
    }
}

/// Every built-in command in listing order.
pub static COMMAND_REGISTRY: &[CommandDefinition] = &[
    command("CALL", true, "SHELL_CMD_CALL_HELP", cmd_call),
    command("CD", false, "SHELL_CMD_CHDIR_HELP", cmd_chdir),
    command("CHDIR", true, "SHELL_CMD_CHDIR_HELP", cmd_chdir),
    command("CHOICE", true, "SHELL_CMD_CHOICE_HELP", cmd_choice),
    command("COPY", false, "SHELL_CMD_COPY_HELP", cmd_copy),
    command("DEL", false, "SHELL_CMD_DELETE_HELP", cmd_delete),
    command("DELETE", true, "SHELL_CMD_DELETE_HELP", cmd_delete),
    command("DIR", false, "SHELL_CMD_DIR_HELP", cmd_dir),
    CommandDefinition {
        name: "ECHO",
        hidden: true,
        help: "SHELL_CMD_ECHO_HELP",
        scan_help: false,
        handler: cmd_echo,
    },
    command("ERASE", true, "SHELL_CMD_DELETE_HELP", cmd_delete),
    command("EXIT", false, "SHELL_CMD_EXIT_HELP", cmd_exit),
    command("GOTO", true, "SHELL_CMD_GOTO_HELP", cmd_goto),
    command("HELP", true, "SHELL_CMD_HELP_HELP", cmd_help),
    command("IF", true, "SHELL_CMD_IF_HELP", cmd_if),
    command("MD", false, "SHELL_CMD_MKDIR_HELP", cmd_mkdir),
    command("MKDIR", true, "SHELL_CMD_MKDIR_HELP", cmd_mkdir),
    command("PAUSE", true, "SHELL_CMD_PAUSE_HELP", cmd_pause),
    command("RD", false, "SHELL_CMD_RMDIR_HELP", cmd_rmdir),
    command("REM", true, "SHELL_CMD_REM_HELP", cmd_rem),
    command("REN", false, "SHELL_CMD_RENAME_HELP", cmd_rename),
    command("RENAME", true, "SHELL_CMD_RENAME_HELP", cmd_rename),
    command("RMDIR", true, "SHELL_CMD_RMDIR_HELP", cmd_rmdir),
    command("SET", true, "SHELL_CMD_SET_HELP", cmd_set),
    command("SHIFT", true, "SHELL_CMD_SHIFT_HELP", cmd_shift),
    command("TYPE", false, "SHELL_CMD_TYPE_HELP", cmd_type),
];

/// Find a built-in by name, ignoring case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name))
}

/// A line split into command name and remainder.
#[derive(Debug, Clone, Copy)]
pub struct Tokenized<'a> {
    pub name: &'a str,
    pub rest: &'a str,
    pub command: Option<&'static CommandDefinition>,
}

/// Split a line into a command name and the rest.
///
/// The name ends at `/`, a tab, or (outside quotes) a space or `=`. When a
/// `.` or `\` is reached and the name so far is a built-in, the name ends
/// there, so `cd..` and `dir\games` work.
#[must_use]
pub fn tokenize(line: &str) -> Tokenized<'_> {
    let line = line.trim();
    let mut quotes = 0usize;

    for (idx, c) in line.char_indices() {
        if c == '/' || c == '\t' || (quotes % 2 == 0 && (c == ' ' || c == '=')) {
            return Tokenized {
                name: &line[..idx],
                rest: &line[idx..],
                command: lookup(&line[..idx]),
            };
        }
        if c == '"' {
            quotes += 1;
        }
        if c == '.' || c == '\\' {
            if let Some(def) = lookup(&line[..idx]) {
                return Tokenized {
                    name: &line[..idx],
                    rest: &line[idx..],
                    command: Some(def),
                };
            }
        }
    }

    Tokenized {
        name: line,
        rest: "",
        command: lookup(line),
    }
}

/// Print the help text of a command.
pub fn print_help(ctx: &mut ShellContext, def: &CommandDefinition) {
    ctx.write_message(def.help, &[]);
    ctx.write("\n");
    let long = format!("{}_LONG", def.help);
    if ctx.messages.contains(&long) {
        ctx.write_message(&long, &[]);
    } else {
        ctx.write(&format!("{}\n", def.name));
    }
}

/// Run one command line. Errors are reported here and go no further.
pub fn execute_line(ctx: &mut ShellContext, line: &str) {
    let line = line.trim();
    let line = line.strip_prefix('@').unwrap_or(line);

    let result = {
        let mut scope = CommandScope::enter(ctx);
        run_command(&mut scope, line)
    };

    if let Err(err) = result {
        ctx.report(&err);
    }
}

fn run_command(ctx: &mut ShellContext, line: &str) -> Result<(), ShellError> {
    let Tokenized {
        name,
        rest,
        command,
    } = tokenize(line);
    if name.is_empty() {
        return Ok(());
    }

    if let Some(def) = command {
        log::debug!("Running {} with {rest:?}", def.name);
        if def.scan_help {
            let mut args = rest.to_string();
            if scan_bool(&mut args, "?") {
                print_help(ctx, def);
                return Ok(());
            }
        }
        return (def.handler)(ctx, rest);
    }

    if run_external(ctx, name, rest)? {
        return Ok(());
    }
    if run_property(ctx, name, rest) {
        return Ok(());
    }
    Err(ShellError::IllegalCommand(name.to_string()))
}

/// Drive switches (`D:`) and batch files. Returns `false` when `name` is
/// neither.
fn run_external(ctx: &mut ShellContext, name: &str, rest: &str) -> Result<bool, ShellError> {
    match name.as_bytes() {
        [letter, b':'] if letter.is_ascii_alphabetic() => {
            let drive = char::from(*letter).to_ascii_uppercase();
            ctx.fs
                .set_default_drive(drive)
                .map_err(|_| ShellError::DriveNotFound(drive))?;
            return Ok(true);
        }
        _ => {}
    }

    let Some(path) = find_batch(ctx, name) else {
        return Ok(false);
    };

    let args = std::iter::once(name.trim_matches('"'))
        .chain(split_args(rest))
        .map(str::to_string)
        .collect();
    start_batch(ctx, &path, args)?;
    Ok(true)
}

/// Locate `name` (or `name.BAT`) in the current directory, then in each
/// `PATH` entry when the name has no directory part.
fn find_batch(ctx: &ShellContext, name: &str) -> Option<String> {
    let name = name.trim_matches('"');
    let (_, last) = split_last_component(name);
    let file = match last.rfind('.') {
        Some(idx) if last[idx..].eq_ignore_ascii_case(".BAT") => name.to_string(),
        Some(_) => return None,
        None => format!("{name}.BAT"),
    };

    let mut dirs = vec![String::new()];
    if !name.contains(['\\', ':']) {
        if let Some(path) = ctx.env.get("PATH") {
            dirs.extend(
                path.split(';')
                    .filter(|dir| !dir.is_empty())
                    .map(|dir| {
                        if dir.ends_with(['\\', ':']) {
                            dir.to_string()
                        } else {
                            format!("{dir}\\")
                        }
                    }),
            );
        }
    }

    dirs.iter().find_map(|dir| {
        let full = ctx.fs.canonicalize(&format!("{dir}{file}")).ok()?;
        let attributes = ctx.fs.attributes(&full).ok()?;
        if attributes.intersects(Attributes::DIRECTORY | Attributes::DEVICE) {
            return None;
        }
        let full = ctx.fs.to_short_path(&full, true).unwrap_or(full);
        log::debug!("{name} resolved to {full}");
        Some(full)
    })
}

/// Start a batch file. Under `CALL` it nests inside the running batch;
/// otherwise it replaces it.
///
/// # Arguments
///
/// * `ctx` - Interpreter state
/// * `path` - Fully qualified path of the script
/// * `args` - `%0` followed by the parameters
///
/// # Errors
///
/// * If the script cannot be read
pub fn start_batch(ctx: &mut ShellContext, path: &str, args: Vec<String>) -> Result<(), ShellError> {
    let replaced = !ctx.call && !ctx.batches.is_empty();
    let saved_echo = match ctx.batch() {
        Some(current) if replaced => current.saved_echo(),
        _ => ctx.echo,
    };

    let batch = BatchFile::load(ctx.fs.as_mut(), path, args, saved_echo)?;
    if replaced {
        ctx.batches.pop();
    }
    log::debug!("Starting batch {path} (depth {})", ctx.batches.len() + 1);
    ctx.batches.push(batch);
    Ok(())
}

/// A property name typed as a command prints its value, or sets it when
/// followed by a value.
fn run_property(ctx: &mut ShellContext, name: &str, rest: &str) -> bool {
    let Some(section) = ctx.properties.section_for(name).map(str::to_string) else {
        return false;
    };

    if rest.trim().is_empty() {
        if let Some(value) = ctx.properties.get(&section, name) {
            let line = format!("{value}\n");
            ctx.write(&line);
        }
    } else {
        let value = rest
            .trim_start_matches(|c: char| c.is_whitespace() || c == '=')
            .trim_end();
        ctx.properties.set(&section, name, value);
    }
    true
}
