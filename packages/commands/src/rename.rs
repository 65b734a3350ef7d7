//! `REN` / `RENAME`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::Attributes;
use dosshell_pattern::{SubstitutionTemplate, has_wildcards, split_last_component};

use crate::collect::{AttributeFilter, EntryList};
use crate::context::ShellContext;
use crate::error::ShellError;
use crate::switches::{reject_remaining, strip_arg};

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenameStep {
    from: String,
    to: String,
    /// Name used in the failure message.
    display: String,
}

/// Split the two arguments and check that the target stays in the source's
/// directory. Returns the source, the directory prefix the renamed names
/// are built in and the bare target template.
fn parse_args(args: &str) -> Result<(String, String, String), ShellError> {
    let (source, rest) = strip_arg(args);
    if source.is_empty() {
        return Err(ShellError::SyntaxError);
    }
    let (target, rest) = strip_arg(rest);
    if target.is_empty() || !rest.trim().is_empty() {
        return Err(ShellError::SyntaxError);
    }

    let (source_dir, _) = split_last_component(source);
    let (target_dir, target_name) = split_last_component(target);

    if source_dir.is_empty() {
        if !target_dir.is_empty() {
            return Err(ShellError::SyntaxError);
        }
        return Ok((source.to_string(), String::new(), target.to_string()));
    }

    if !target_dir.is_empty() && !target_dir.eq_ignore_ascii_case(source_dir) {
        return Err(ShellError::IllegalPath);
    }

    Ok((
        source.to_string(),
        source_dir.to_string(),
        target_name.to_string(),
    ))
}

/// Work out every rename before touching the disk.
fn plan(ctx: &mut ShellContext, source: &str, dir: &str, target: &str) -> Option<Vec<RenameStep>> {
    let full = ctx.fs.canonicalize(source).ok()?;

    let mask = if has_wildcards(source) {
        Attributes::ALL_BUT_VOLUME - Attributes::DIRECTORY
    } else {
        Attributes::ALL_BUT_VOLUME
    };
    let mut everything = AttributeFilter::default();
    everything.show_all();
    let entries = EntryList::collect(ctx.fs.as_mut(), &full, mask, &everything);

    let long_names = ctx.long_names();
    let template = SubstitutionTemplate::parse(target);

    Some(
        entries
            .iter()
            .filter(|entry| !entry.is_dot_entry())
            .map(|entry| {
                let name = entry.name(long_names);
                let renamed = template.apply(name, None);
                log::trace!("REN {name} -> {renamed}");
                RenameStep {
                    from: format!("{dir}{name}"),
                    to: format!("{dir}{renamed}"),
                    display: format!("{dir}{name}"),
                }
            })
            .collect(),
    )
}

/// `REN source target`
///
/// The target may carry `*` and `?`, filled in from each matched name. A
/// path on the target must be the source's own directory.
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] for any switch
/// * [`ShellError::SyntaxError`] unless there are exactly two names
/// * [`ShellError::IllegalPath`] if the target points elsewhere
/// * [`ShellError::RenameFailure`] if nothing matches
pub fn cmd_rename(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let args = args.trim();
    reject_remaining(args)?;

    let (source, dir, target) = parse_args(args)?;
    log::debug!("REN {source} -> {dir}{target}");

    let Some(steps) = plan(ctx, &source, &dir, &target) else {
        return Ok(());
    };
    if steps.is_empty() {
        return Err(ShellError::RenameFailure(source));
    }

    for step in steps {
        if let Err(e) = ctx.fs.rename(&step.from, &step.to) {
            log::debug!("Rename {} -> {}: {e}", step.from, step.to);
            ctx.report(&ShellError::RenameFailure(step.display));
        }
    }
    Ok(())
}
