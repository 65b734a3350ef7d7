//! `DEL` / `ERASE` / `DELETE`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::{Attributes, FsError};
use dosshell_pattern::{expand_dot, split_last_component};

use crate::collect::{AttributeFilter, EntryList};
use crate::console::CTRL_C;
use crate::context::ShellContext;
use crate::error::ShellError;
use crate::prompt::{Answer, PromptKind, confirm};
use crate::switches::{reject_remaining, scan_bool};

/// Turn the typed argument into the pattern to delete: a directory means
/// everything in it, and `.` means everything here.
fn delete_pattern(ctx: &ShellContext, args: &str) -> Result<String, ShellError> {
    let mut pattern = expand_dot(args);
    ctx.fs
        .canonicalize(&pattern)
        .map_err(|_| ShellError::IllegalPath)?;

    if !pattern.ends_with('\\')
        && pattern != "*.*"
        && ctx
            .fs
            .attributes(&pattern)
            .is_ok_and(|a| a.contains(Attributes::DIRECTORY))
    {
        pattern.push('\\');
    }

    if pattern.ends_with('\\') {
        pattern.push_str("*.*");
    } else if pattern == "." || pattern.ends_with(":.") || pattern.ends_with("\\.") {
        pattern.pop();
        pattern.push_str("*.*");
    } else if ctx.long_names() && pattern.contains('*') {
        let last = pattern.rsplit('\\').next().unwrap_or("");
        if !last.is_empty() && pattern.ends_with('*') && !last.contains('.') {
            pattern.push_str(".*");
        }
    }

    Ok(pattern)
}

/// Whether the pattern deletes every file of a directory.
fn is_whole_directory(pattern: &str) -> bool {
    pattern == "*.*" || (pattern.len() > 3 && (pattern.ends_with("\\*.*") || pattern.ends_with(":*.*")))
}

/// Unlink one file. With `force`, a read-only file has the attribute
/// cleared first and put back if the unlink still fails.
fn remove_file(
    ctx: &mut ShellContext,
    path: &str,
    attributes: Attributes,
    force: bool,
) -> Result<(), FsError> {
    let reset = force
        && attributes.contains(Attributes::READ_ONLY)
        && ctx
            .fs
            .set_attributes(path, attributes - Attributes::READ_ONLY)
            .is_ok();

    match ctx.fs.unlink(path) {
        Ok(()) => Ok(()),
        Err(e) => {
            if reset {
                if let Err(restore) = ctx.fs.set_attributes(path, attributes) {
                    log::warn!("Could not restore attributes of {path}: {restore}");
                }
            }
            Err(e)
        }
    }
}

/// `DEL [/P] [/F] [/Q] names`
///
/// Directories are never deleted. A failure on one file is reported and the
/// next file is tried.
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] / [`ShellError::MissingParameter`] for bad arguments
/// * [`ShellError::IllegalPath`] if the name cannot be resolved
/// * [`ShellError::DeleteFailure`] if nothing matches at all
/// * [`ShellError::FileNotFound`] if only directories match
/// * [`ShellError::Cancelled`] on Ctrl-C at a prompt
pub fn cmd_delete(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut args = args.to_string();
    let prompt_each = scan_bool(&mut args, "P");
    let force = scan_bool(&mut args, "F");
    let quiet = scan_bool(&mut args, "Q");
    reject_remaining(&args)?;

    let args = args.trim();
    if args.is_empty() {
        return Err(ShellError::MissingParameter);
    }

    let target = delete_pattern(ctx, args)?;
    log::debug!("DEL {target} (prompt={prompt_each} force={force} quiet={quiet})");

    if is_whole_directory(&target) && !quiet {
        let question = ctx.messages.get("SHELL_CMD_DEL_SURE").to_string();
        if confirm(ctx.console.as_mut(), &question, PromptKind::YesNo)? == Answer::No {
            return Ok(());
        }
    }

    let full = ctx
        .fs
        .canonicalize(&target)
        .map_err(|_| ShellError::IllegalPath)?;
    let (dir, _) = split_last_component(&full);

    let mut everything = AttributeFilter::default();
    everything.show_all();
    let entries = EntryList::collect(
        ctx.fs.as_mut(),
        &full,
        Attributes::ALL_BUT_VOLUME,
        &everything,
    );
    if entries.is_empty() {
        return Err(ShellError::DeleteFailure(target));
    }

    let long_names = ctx.long_names();
    let mut found = false;

    for entry in entries.iter().filter(|entry| !entry.is_directory()) {
        found = true;
        let path = format!("{dir}{}", entry.short_name);
        let display = format!("{dir}{}", entry.name(long_names));

        if !force && entry.attributes.contains(Attributes::READ_ONLY) {
            ctx.report(&ShellError::DeleteFailure(display));
            continue;
        }

        if prompt_each {
            ctx.write_message("SHELL_CMD_DEL_CONFIRM", &[&display]);
            match ctx.console.read_byte() {
                Some(CTRL_C) | None => return Err(ShellError::Cancelled),
                Some(b'y' | b'Y') => ctx.write("Y\n"),
                Some(_) => {
                    ctx.write("N\n");
                    continue;
                }
            }
        }

        if let Err(e) = remove_file(ctx, &path, entry.attributes, force) {
            log::debug!("Unlink {path}: {e}");
            ctx.report(&ShellError::DeleteFailure(display));
        }
    }

    if !found {
        return Err(ShellError::FileNotFound(target));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ENTER, ScriptedConsole};
    use dosshell_config::{MessageCatalog, PropertyStore};
    use dosshell_fs::HostFileSystem;
    use tempfile::TempDir;

    fn setup(files: &[&str], input: &[u8]) -> (TempDir, ShellContext, ScriptedConsole) {
        let temp = TempDir::new().unwrap();
        for file in files {
            std::fs::write(temp.path().join(file), file.as_bytes()).unwrap();
        }
        let mut fs = HostFileSystem::new();
        fs.mount('C', temp.path()).unwrap();
        let probe = ScriptedConsole::new(input);
        let ctx = ShellContext::new(
            Box::new(fs),
            Box::new(probe.clone()),
            MessageCatalog::default(),
            PropertyStore::default(),
        );
        (temp, ctx, probe)
    }

    #[test]
    fn test_delete_pattern_normalisation() {
        let (temp, ctx, _probe) = setup(&[], b"");
        std::fs::create_dir(temp.path().join("sub")).unwrap();

        assert_eq!(delete_pattern(&ctx, ".").unwrap(), "*.*");
        assert_eq!(delete_pattern(&ctx, "sub").unwrap(), "sub\\*.*");
        assert_eq!(delete_pattern(&ctx, "sub\\").unwrap(), "sub\\*.*");
        assert_eq!(delete_pattern(&ctx, "a*").unwrap(), "a*.*");
        assert_eq!(delete_pattern(&ctx, "a.txt").unwrap(), "a.txt");

        assert!(is_whole_directory("*.*"));
        assert!(is_whole_directory("C:\\GAMES\\*.*"));
        assert!(!is_whole_directory("*.TXT"));
    }

    #[test]
    fn test_delete_matching_files_only() {
        let (temp, mut ctx, probe) = setup(&["a.txt", "b.txt", "keep.doc"], b"");
        cmd_delete(&mut ctx, "*.txt").unwrap();

        assert!(!temp.path().join("a.txt").exists());
        assert!(!temp.path().join("b.txt").exists());
        assert!(temp.path().join("keep.doc").exists());
        assert_eq!(probe.output(), "");
    }

    #[test]
    fn test_whole_directory_asks_first() {
        let (temp, mut ctx, probe) = setup(&["a.txt"], &[b'n', ENTER]);
        cmd_delete(&mut ctx, "*.*").unwrap();
        assert!(temp.path().join("a.txt").exists());
        assert_eq!(
            probe.take_output(),
            "All files in directory will be deleted!\nAre you sure (Y/N)?N\n"
        );

        probe.push_input(&[b'y', ENTER]);
        cmd_delete(&mut ctx, ".").unwrap();
        assert!(!temp.path().join("a.txt").exists());
    }

    #[test]
    fn test_quiet_skips_confirmation() {
        let (temp, mut ctx, probe) = setup(&["a.txt", "b.doc"], b"");
        cmd_delete(&mut ctx, "/q *.*").unwrap();
        assert!(!temp.path().join("a.txt").exists());
        assert!(!temp.path().join("b.doc").exists());
        assert_eq!(probe.output(), "");
    }

    #[test]
    fn test_read_only_needs_force() {
        let (temp, mut ctx, probe) = setup(&["locked.txt"], b"");
        ctx.fs
            .set_attributes("LOCKED.TXT", Attributes::READ_ONLY | Attributes::ARCHIVE)
            .unwrap();

        cmd_delete(&mut ctx, "locked.txt").unwrap();
        assert!(temp.path().join("locked.txt").exists());
        assert_eq!(probe.take_output(), "Unable to delete: C:\\locked.txt.\n");

        cmd_delete(&mut ctx, "/f locked.txt").unwrap();
        assert!(!temp.path().join("locked.txt").exists());
    }

    #[test]
    fn test_prompt_each_file() {
        let (temp, mut ctx, probe) = setup(&["a.txt", "b.txt"], b"yn");
        cmd_delete(&mut ctx, "/p *.txt").unwrap();

        assert!(!temp.path().join("a.txt").exists());
        assert!(temp.path().join("b.txt").exists());
        assert_eq!(
            probe.output(),
            "Delete C:\\a.txt (Y/N)?Y\nDelete C:\\b.txt (Y/N)?N\n"
        );
    }

    #[test]
    fn test_ctrl_c_stops_remaining_files() {
        let (temp, mut ctx, _probe) = setup(&["a.txt", "b.txt", "c.txt"], &[b'y', CTRL_C]);
        assert!(matches!(
            cmd_delete(&mut ctx, "/p *.txt"),
            Err(ShellError::Cancelled)
        ));

        assert!(!temp.path().join("a.txt").exists());
        assert!(temp.path().join("b.txt").exists());
        assert!(temp.path().join("c.txt").exists());
    }

    #[test]
    fn test_argument_errors() {
        let (temp, mut ctx, _probe) = setup(&[], b"");
        std::fs::create_dir(temp.path().join("onlydir")).unwrap();

        assert!(matches!(
            cmd_delete(&mut ctx, "  "),
            Err(ShellError::MissingParameter)
        ));
        assert!(matches!(
            cmd_delete(&mut ctx, "/x a.txt"),
            Err(ShellError::IllegalSwitch(s)) if s == "/x"
        ));
        assert!(matches!(
            cmd_delete(&mut ctx, "nothing.txt"),
            Err(ShellError::DeleteFailure(name)) if name == "nothing.txt"
        ));
        assert!(matches!(
            cmd_delete(&mut ctx, "only*"),
            Err(ShellError::FileNotFound(name)) if name == "only*.*"
        ));
        assert!(temp.path().join("onlydir").is_dir());
    }
}
