//! `COPY`.
//!
//! Arguments are split on `+` into a [`CopyPlan`]. Every source except the
//! last in a `+` run carries the concatenate flag; the run is written into
//! one target that stays open until the run ends.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::{Attributes, DosDateTime, FsError, Handle, OpenMode};
use dosshell_pattern::{SubstitutionTemplate, has_wildcards, split_last_component, wildcard_offset};

use crate::collect::{AttributeFilter, EntryList};
use crate::console::{CTRL_C, ENTER, EOF_MARKER};
use crate::context::ShellContext;
use crate::error::ShellError;
use crate::prompt::{Answer, PromptKind, confirm};
use crate::stream::InputStream;
use crate::switches::{reject_remaining, scan_bool, strip_arg};

const BUFFER_SIZE: usize = 0x8000;

/// One `+`-separated item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySource {
    pub name: String,
    /// Whether the next item is appended to the same target.
    pub concat: bool,
}

impl CopySource {
    fn new(name: &str, concat: bool) -> Self {
        Self {
            name: name.to_string(),
            concat,
        }
    }
}

/// The sources and target of one `COPY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    pub sources: Vec<CopySource>,
    pub target: CopySource,
}

impl CopyPlan {
    /// Split the arguments (switches already removed).
    ///
    /// The last item is the target unless it ends a `+` run. Without a
    /// target, `.` is used with the concatenate flag set, which makes
    /// `a+b+c` append into `a`.
    ///
    /// # Errors
    ///
    /// * [`ShellError::MissingParameter`] if there is no source
    pub fn parse(args: &str) -> Result<Self, ShellError> {
        let mut sources: Vec<CopySource> = Vec::new();
        let mut rest = args;

        loop {
            let (word, remaining) = strip_arg(rest);
            if word.is_empty() && remaining.trim().is_empty() {
                break;
            }
            rest = remaining;

            let mut word = word;
            while !word.is_empty() {
                if let Some(after) = word.strip_prefix('+') {
                    if let Some(last) = sources.last_mut() {
                        last.concat = true;
                    }
                    word = after;
                    continue;
                }
                match word.split_once('+') {
                    Some((name, after)) => {
                        sources.push(CopySource::new(name, true));
                        word = after;
                    }
                    None => {
                        sources.push(CopySource::new(word, false));
                        word = "";
                    }
                }
            }
        }

        if sources.first().is_none_or(|first| first.name.is_empty()) {
            return Err(ShellError::MissingParameter);
        }

        let has_target = sources.len() > 1 && !sources[sources.len() - 2].concat;
        let target = if has_target { sources.pop() } else { None };
        let target = target.unwrap_or_else(|| CopySource::new(".", true));

        Ok(Self { sources, target })
    }

    /// Turn directory names into `dir\*.*` and, in long-name mode, give a
    /// trailing `*` an extension wildcard.
    fn resolve_directories(&mut self, ctx: &ShellContext) {
        for item in self.sources.iter_mut().chain(std::iter::once(&mut self.target)) {
            item.name = resolve_name(ctx, &item.name);
        }
    }
}

fn resolve_name(ctx: &ShellContext, name: &str) -> String {
    if name.ends_with(':') {
        return format!("{name}*.*");
    }

    let mut resolved = name.to_string();
    if ctx.long_names() && name.ends_with('*') {
        let (_, last) = split_last_component(name);
        if !last.contains('.') {
            resolved.push_str(".*");
        }
    }

    if !has_wildcards(name) {
        if name.ends_with('\\') {
            resolved.push_str("*.*");
        } else if ctx
            .fs
            .attributes(name)
            .is_ok_and(|a| a.contains(Attributes::DIRECTORY))
        {
            resolved.push_str("\\*.*");
        }
    }
    resolved
}

/// Whether two paths name the same file.
fn same_file(ctx: &ShellContext, a: &str, b: &str) -> bool {
    match (ctx.fs.to_short_path(a, false), ctx.fs.to_short_path(b, false)) {
        (Ok(a), Ok(b)) => a.eq_ignore_ascii_case(&b),
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// The target currently held open.
#[derive(Debug)]
struct OpenTarget {
    path: String,
    handle: Handle,
}

/// State carried across all sources of one `COPY`.
#[derive(Debug, Default)]
struct CopyRun {
    assume_yes: bool,
    count: u32,
    writer: Option<OpenTarget>,
}

impl CopyRun {
    fn close_writer(&mut self, ctx: &mut ShellContext) -> Result<(), FsError> {
        match self.writer.take() {
            Some(open) => ctx.fs.close_file(open.handle),
            None => Ok(()),
        }
    }

    /// The handle to write `path` through, reusing the open target when a
    /// run continues into it.
    fn target_handle(
        &mut self,
        ctx: &mut ShellContext,
        path: &str,
        append: bool,
    ) -> Result<Handle, FsError> {
        if append {
            if let Some(open) = self.writer.as_ref().filter(|open| open.path == path) {
                return Ok(open.handle);
            }
        }
        if let Err(e) = self.close_writer(ctx) {
            log::warn!("Closing previous target failed: {e}");
        }

        let handle = if append {
            let handle = ctx.fs.open_file(path, OpenMode::ReadWrite)?;
            if let Err(e) = ctx.fs.seek_to_end(handle) {
                if let Err(close) = ctx.fs.close_file(handle) {
                    log::debug!("Closing {path}: {close}");
                }
                return Err(e);
            }
            handle
        } else {
            ctx.fs.create_file(path)?
        };

        self.writer = Some(OpenTarget {
            path: path.to_string(),
            handle,
        });
        Ok(handle)
    }

    fn copy_source(
        &mut self,
        ctx: &mut ShellContext,
        source: &CopySource,
        prior_concat: bool,
        target: &CopySource,
    ) -> Result<(), ShellError> {
        let source_full = ctx
            .fs
            .canonicalize(&source.name)
            .map_err(|_| ShellError::IllegalPath)?;
        let (source_dir, _) = split_last_component(&source_full);
        let source_dir = source_dir.to_string();

        let mut target_path = ctx
            .fs
            .canonicalize(&target.name)
            .map_err(|_| ShellError::IllegalPath)?;
        let directory_part = target_path
            .strip_suffix("*.*")
            .filter(|dir| dir.ends_with('\\'))
            .map(str::len);
        if let Some(len) = directory_part {
            target_path.truncate(len);
        }

        let mut target_is_file = true;
        if target_path.ends_with('\\') {
            target_is_file = false;
        } else if ctx
            .fs
            .attributes(&target_path)
            .is_ok_and(|a| a.contains(Attributes::DIRECTORY))
        {
            target_path.push('\\');
            target_is_file = false;
        }

        let template = SubstitutionTemplate::parse(&target_path);
        let offset = if template.needs_offset() {
            Some(wildcard_offset(&source.name).map_err(|_| ShellError::IllegalPath)?)
        } else {
            None
        };

        let mut everything = AttributeFilter::default();
        everything.show_all();
        let entries = EntryList::collect(
            ctx.fs.as_mut(),
            &source_full,
            Attributes::ALL_BUT_VOLUME,
            &everything,
        );
        if entries.is_empty() {
            return Err(ShellError::FileNotFound(source.name.clone()));
        }

        let long_names = ctx.long_names();
        let mut append = prior_concat;
        let mut second_file = false;

        for entry in entries.iter().filter(|entry| !entry.is_directory()) {
            let name = entry.name(long_names);
            let source_path = format!("{source_dir}{}", entry.short_name);
            let target_name = template.apply(name, offset);

            let special = second_file && target_is_file && !target.name.contains('*');
            second_file = true;
            if special {
                append = true;
            }

            if same_file(ctx, &source_path, &target_name) {
                if !append {
                    return Err(ShellError::SelfCopy);
                }
                log::debug!("Skipping {source_path}, it is the target being appended to");
                continue;
            }

            let exists = ctx.fs.attributes(&target_name).is_ok();
            if exists && !append && !self.assume_yes && !ctx.fs.is_device(&target_name) {
                let question = ctx.messages.format("SHELL_CMD_COPY_CONFIRM", &[&target_name]);
                match confirm(ctx.console.as_mut(), &question, PromptKind::YesNoAll)? {
                    Answer::No => continue,
                    Answer::All => self.assume_yes = true,
                    Answer::Yes => {}
                }
            }

            let copied = self.copy_file(ctx, &source_path, &target_name, append, exists, name)?;

            if copied && !source.concat && !special {
                self.count += 1;
            }
            if entry.attributes.contains(Attributes::DEVICE) {
                break;
            }
        }

        Ok(())
    }

    fn copy_file(
        &mut self,
        ctx: &mut ShellContext,
        source_path: &str,
        target_name: &str,
        append: bool,
        existed: bool,
        display: &str,
    ) -> Result<bool, ShellError> {
        let input = match InputStream::open(ctx, source_path) {
            Ok(input) => input,
            Err(e) => {
                log::debug!("Open {source_path}: {e}");
                ctx.report(&ShellError::CopyFailure(source_path.to_string()));
                return Ok(false);
            }
        };

        let stamp = match input {
            InputStream::File(handle) => match ctx.fs.file_time(handle) {
                Ok(stamp) => Some(stamp),
                Err(e) => {
                    log::warn!("COPY cannot read the date of {source_path}: {e}");
                    None
                }
            },
            InputStream::Console => None,
        };

        let handle = match self.target_handle(ctx, target_name, append) {
            Ok(handle) => handle,
            Err(e) => {
                log::debug!("Open target {target_name}: {e}");
                close_quietly(ctx, input);
                ctx.report(&ShellError::CopyFailure(target_name.to_string()));
                return Ok(false);
            }
        };

        let outcome = transfer(ctx, input, handle);
        let mut failed = input.close(ctx).is_err();

        match outcome {
            Err(ShellError::Cancelled) => {
                if let Err(e) = self.close_writer(ctx) {
                    log::debug!("Closing {target_name}: {e}");
                }
                if !existed {
                    if let Err(e) = ctx.fs.unlink(target_name) {
                        log::warn!("Could not remove partial {target_name}: {e}");
                    }
                }
                return Err(ShellError::Cancelled);
            }
            Err(e) => {
                log::debug!("Copying {source_path} failed: {e}");
                failed = true;
            }
            Ok(()) => {}
        }

        if failed {
            if let Err(e) = self.close_writer(ctx) {
                log::debug!("Closing {target_name}: {e}");
            }
            ctx.write_message("SHELL_CMD_COPY_ERROR", &[&display]);
            return Ok(false);
        }

        if !append {
            apply_stamp(ctx, handle, stamp, target_name);
        }

        let short = source_path.rsplit('\\').next().unwrap_or(source_path);
        if display.eq_ignore_ascii_case(short) {
            ctx.write(&format!(" {display}\n"));
        } else {
            ctx.write(&format!(" {display} [{short}]\n"));
        }
        Ok(true)
    }
}

fn close_quietly(ctx: &mut ShellContext, input: InputStream) {
    if let Err(e) = input.close(ctx) {
        log::debug!("Closing source: {e}");
    }
}

fn apply_stamp(ctx: &mut ShellContext, handle: Handle, stamp: Option<DosDateTime>, target: &str) {
    if let Some(stamp) = stamp {
        if let Err(e) = ctx.fs.set_file_time(handle, stamp) {
            log::warn!("COPY cannot set the date of {target}: {e}");
        }
    }
}

/// Pump bytes from `input` into `handle`. Console input ends at the
/// end-of-file marker and is echoed as it is typed.
fn transfer(ctx: &mut ShellContext, input: InputStream, handle: Handle) -> Result<(), ShellError> {
    let mut buf = vec![0u8; BUFFER_SIZE];
    loop {
        let n = input.read(ctx, &mut buf)?;
        if n == 0 {
            return Ok(());
        }
        let mut chunk = &buf[..n];
        let mut done = false;

        if input.is_console() {
            if chunk.first() == Some(&CTRL_C) {
                return Err(ShellError::Cancelled);
            }
            if let Some(end) = chunk.iter().position(|&b| b == EOF_MARKER) {
                chunk = &chunk[..end];
                done = true;
            }
            if chunk.first() == Some(&ENTER) {
                ctx.write("\n");
            } else {
                ctx.console.write_bytes(chunk);
            }
        }

        ctx.fs.write_bytes(handle, chunk)?;
        if done {
            return Ok(());
        }
    }
}

/// `COPY [/Y | /-Y] source[+source...] [target]`
///
/// `/B`, `/T`, `/A` and `/V` are accepted and ignored. `/Y` in `COPYCMD`
/// turns overwrite confirmation off unless `/-Y` is given.
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] / [`ShellError::MissingParameter`] for bad arguments
/// * [`ShellError::IllegalPath`] if a name cannot be resolved
/// * [`ShellError::FileNotFound`] if a source matches nothing
/// * [`ShellError::SelfCopy`] if a file would be copied onto itself
/// * [`ShellError::Cancelled`] on Ctrl-C
pub fn cmd_copy(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut args = args.trim().to_string();
    scan_bool(&mut args, "B");
    scan_bool(&mut args, "T");
    scan_bool(&mut args, "A");

    let mut assume_yes = scan_bool(&mut args, "Y");
    if let Some(copycmd) = ctx.env.get("COPYCMD") {
        let mut copycmd = copycmd.to_string();
        if scan_bool(&mut copycmd, "Y") && !scan_bool(&mut copycmd, "-Y") {
            assume_yes = true;
        }
    }
    if scan_bool(&mut args, "-Y") {
        assume_yes = false;
    }
    scan_bool(&mut args, "V");
    reject_remaining(&args)?;

    let mut plan = CopyPlan::parse(&args)?;
    plan.resolve_directories(ctx);
    log::debug!("COPY {plan:?} (assume_yes={assume_yes})");

    let mut run = CopyRun {
        assume_yes,
        ..CopyRun::default()
    };
    let mut target = plan.target;
    let mut previous = CopySource::default();

    let mut outcome = Ok(());
    for source in plan.sources {
        let prior = std::mem::replace(&mut previous, source.clone());
        if !prior.concat && source.concat && target.concat {
            target = source;
            continue;
        }
        outcome = run.copy_source(ctx, &source, prior.concat, &target);
        if outcome.is_err() {
            break;
        }
    }

    if let Err(e) = run.close_writer(ctx) {
        log::warn!("Closing target failed: {e}");
    }
    outcome?;

    ctx.write_message("SHELL_CMD_COPY_SUCCESS", &[&run.count]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use dosshell_config::{MessageCatalog, PropertyStore};
    use dosshell_fs::HostFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)], input: &[u8]) -> (TempDir, ShellContext, ScriptedConsole) {
        let temp = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(temp.path().join(name), contents).unwrap();
        }
        let mut host = HostFileSystem::new();
        host.mount('C', temp.path()).unwrap();
        let probe = ScriptedConsole::new(input);
        let ctx = ShellContext::new(
            Box::new(host),
            Box::new(probe.clone()),
            MessageCatalog::default(),
            PropertyStore::default(),
        );
        (temp, ctx, probe)
    }

    fn source(name: &str, concat: bool) -> CopySource {
        CopySource::new(name, concat)
    }

    fn read(temp: &TempDir, name: &str) -> String {
        fs::read_to_string(temp.path().join(name)).unwrap()
    }

    #[test]
    fn test_plan_target_selection() {
        let plan = CopyPlan::parse("a.txt b.txt").unwrap();
        assert_eq!(plan.sources, vec![source("a.txt", false)]);
        assert_eq!(plan.target, source("b.txt", false));

        let plan = CopyPlan::parse("a+b+c").unwrap();
        assert_eq!(
            plan.sources,
            vec![source("a", true), source("b", true), source("c", false)]
        );
        assert_eq!(plan.target, source(".", true));

        let plan = CopyPlan::parse("a+b c").unwrap();
        assert_eq!(plan.sources, vec![source("a", true), source("b", false)]);
        assert_eq!(plan.target, source("c", false));

        let plan = CopyPlan::parse("a.txt").unwrap();
        assert_eq!(plan.sources, vec![source("a.txt", false)]);
        assert_eq!(plan.target, source(".", true));
    }

    #[test]
    fn test_plan_plus_between_words() {
        let plan = CopyPlan::parse("a +b").unwrap();
        assert_eq!(plan.sources, vec![source("a", true), source("b", false)]);

        let plan = CopyPlan::parse("a + b out").unwrap();
        assert_eq!(plan.sources, vec![source("a", true), source("b", false)]);
        assert_eq!(plan.target, source("out", false));

        let plan = CopyPlan::parse("a+ b").unwrap();
        assert_eq!(plan.sources, vec![source("a", true), source("b", false)]);

        assert!(matches!(CopyPlan::parse("  "), Err(ShellError::MissingParameter)));
    }

    #[test]
    fn test_copy_single_file() {
        let (temp, mut ctx, probe) = setup(&[("a.txt", "alpha")], b"");
        cmd_copy(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "alpha");
        assert_eq!(probe.output(), " a.txt\n   1 file(s) copied.\n");
    }

    #[test]
    fn test_copy_keeps_source_date() {
        let (temp, mut ctx, _probe) = setup(&[("a.txt", "alpha")], b"");
        let stamp = DosDateTime::new(1994, 6, 1, 12, 30, 0);
        let handle = ctx.fs.open_file("a.txt", OpenMode::ReadWrite).unwrap();
        ctx.fs.set_file_time(handle, stamp).unwrap();
        ctx.fs.close_file(handle).unwrap();

        cmd_copy(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "alpha");
        assert!(ctx.fs.find_first("b.txt", Attributes::ALL_BUT_VOLUME));
        assert_eq!(ctx.fs.result().unwrap().stamp, stamp);
    }

    #[test]
    fn test_concatenate_into_first_source() {
        let (temp, mut ctx, probe) =
            setup(&[("a.txt", "one "), ("b.txt", "two "), ("c.txt", "three")], b"");
        cmd_copy(&mut ctx, "a.txt+b.txt+c.txt").unwrap();

        assert_eq!(read(&temp, "a.txt"), "one two three");
        assert!(probe.output().ends_with("   1 file(s) copied.\n"));
    }

    #[test]
    fn test_concatenate_into_named_target() {
        let (temp, mut ctx, probe) =
            setup(&[("a.txt", "1"), ("b.txt", "2"), ("c.txt", "3")], b"");
        cmd_copy(&mut ctx, "a.txt+b.txt+c.txt all.txt").unwrap();

        assert_eq!(read(&temp, "all.txt"), "123");
        assert_eq!(read(&temp, "a.txt"), "1");
        assert_eq!(
            probe.output(),
            " a.txt\n b.txt\n c.txt\n   1 file(s) copied.\n"
        );
    }

    #[test]
    fn test_wildcard_into_directory() {
        let (temp, mut ctx, probe) = setup(&[("a.txt", "a"), ("b.txt", "b"), ("c.doc", "c")], b"");
        fs::create_dir(temp.path().join("sub")).unwrap();

        cmd_copy(&mut ctx, "*.txt sub").unwrap();
        assert_eq!(read(&temp, "sub/a.txt"), "a");
        assert_eq!(read(&temp, "sub/b.txt"), "b");
        assert!(!temp.path().join("sub").join("c.doc").exists());
        assert!(probe.output().ends_with("   2 file(s) copied.\n"));
    }

    #[test]
    fn test_wildcard_target_substitutes_names() {
        let (temp, mut ctx, _probe) = setup(&[("a.txt", "a"), ("report.txt", "r")], b"");
        cmd_copy(&mut ctx, "*.txt *.bak").unwrap();
        assert_eq!(read(&temp, "a.bak"), "a");
        assert_eq!(read(&temp, "report.bak"), "r");
    }

    #[test]
    fn test_wildcard_into_single_file_concatenates() {
        let (temp, mut ctx, probe) = setup(&[("a.txt", "a"), ("b.txt", "b")], b"");
        cmd_copy(&mut ctx, "*.txt joined.dat").unwrap();
        assert_eq!(read(&temp, "joined.dat"), "ab");
        assert!(probe.output().ends_with("   1 file(s) copied.\n"));
    }

    #[test]
    fn test_directory_source_copies_contents() {
        let (temp, mut ctx, _probe) = setup(&[], b"");
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::create_dir(temp.path().join("dst")).unwrap();
        fs::write(temp.path().join("src").join("x.txt"), "x").unwrap();

        cmd_copy(&mut ctx, "src dst").unwrap();
        assert_eq!(read(&temp, "dst/x.txt"), "x");
    }

    #[test]
    fn test_overwrite_prompt() {
        let (temp, mut ctx, probe) = setup(&[("a.txt", "new"), ("b.txt", "old")], &[b'n', ENTER]);
        cmd_copy(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "old");
        assert_eq!(
            probe.take_output(),
            "Overwrite C:\\b.txt (Yes/No/All)?N\n   0 file(s) copied.\n"
        );

        probe.push_input(&[b'y', ENTER]);
        cmd_copy(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "new");
    }

    #[test]
    fn test_overwrite_all_stops_asking() {
        let (temp, mut ctx, probe) = setup(
            &[("a.txt", "A"), ("b.txt", "B"), ("a.bak", "-"), ("b.bak", "-")],
            &[b'a', ENTER],
        );
        cmd_copy(&mut ctx, "*.txt *.bak").unwrap();
        assert_eq!(read(&temp, "a.bak"), "A");
        assert_eq!(read(&temp, "b.bak"), "B");
        assert_eq!(probe.output().matches("Overwrite").count(), 1);
    }

    #[test]
    fn test_yes_switch_and_copycmd() {
        let (temp, mut ctx, probe) = setup(&[("a.txt", "new"), ("b.txt", "old")], b"");
        cmd_copy(&mut ctx, "/y a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "new");
        assert!(!probe.take_output().contains("Overwrite"));

        fs::write(temp.path().join("b.txt"), "old").unwrap();
        ctx.env.set("COPYCMD", "/Y");
        cmd_copy(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "new");

        fs::write(temp.path().join("b.txt"), "old").unwrap();
        probe.push_input(&[b'n', ENTER]);
        cmd_copy(&mut ctx, "/-y a.txt b.txt").unwrap();
        assert_eq!(read(&temp, "b.txt"), "old");
    }

    #[test]
    fn test_self_copy_is_rejected() {
        let (temp, mut ctx, _probe) = setup(&[("a.txt", "keep")], b"");
        assert!(matches!(
            cmd_copy(&mut ctx, "a.txt A.TXT"),
            Err(ShellError::SelfCopy)
        ));
        assert!(matches!(cmd_copy(&mut ctx, "a.txt"), Err(ShellError::SelfCopy)));
        assert_eq!(read(&temp, "a.txt"), "keep");
    }

    #[test]
    fn test_missing_source_and_bad_switch() {
        let (_temp, mut ctx, probe) = setup(&[], b"");
        assert!(matches!(
            cmd_copy(&mut ctx, "none.txt x.txt"),
            Err(ShellError::FileNotFound(name)) if name == "none.txt"
        ));
        assert!(matches!(
            cmd_copy(&mut ctx, "/z a b"),
            Err(ShellError::IllegalSwitch(s)) if s == "/z"
        ));
        assert!(matches!(cmd_copy(&mut ctx, "/b /v"), Err(ShellError::MissingParameter)));
        assert_eq!(probe.output(), "");
    }

    #[test]
    fn test_copy_from_console() {
        let (temp, mut ctx, probe) = setup(&[], &[b'h', b'i', EOF_MARKER]);
        cmd_copy(&mut ctx, "con typed.txt").unwrap();
        assert_eq!(read(&temp, "typed.txt"), "hi");
        assert_eq!(probe.output(), "hi CON\n   1 file(s) copied.\n");
    }

    #[test]
    fn test_console_ctrl_c_removes_new_target() {
        let (temp, mut ctx, _probe) = setup(&[], &[b'h', CTRL_C]);
        assert!(matches!(
            cmd_copy(&mut ctx, "con typed.txt"),
            Err(ShellError::Cancelled)
        ));
        assert!(!temp.path().join("typed.txt").exists());
    }
}
