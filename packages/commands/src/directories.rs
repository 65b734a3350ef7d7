//! `CD`, `MD` and `RD`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::context::ShellContext;
use crate::error::ShellError;
use crate::switches::reject_remaining;

/// `CD [X:][path]`. Without a path the current directory is printed; `X:`
/// alone prints that drive's current directory.
///
/// # Errors
///
/// * [`ShellError::DriveNotFound`] for `X:` on an unmounted drive
/// * [`ShellError::ChangeDirFailure`] if the directory does not exist
pub fn cmd_chdir(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let args = args.trim();

    if args.is_empty() {
        let drive = ctx.fs.default_drive();
        let dir = ctx.fs.current_dir(drive)?;
        ctx.write(&format!("{dir}\n"));
        return Ok(());
    }

    if let [letter, b':'] = args.as_bytes() {
        let drive = char::from(*letter).to_ascii_uppercase();
        let dir = ctx
            .fs
            .current_dir(drive)
            .map_err(|_| ShellError::DriveNotFound(drive))?;
        ctx.write(&format!("{dir}\n"));
        return Ok(());
    }

    ctx.fs.change_dir(args).map_err(|e| {
        log::debug!("CD {args}: {e}");
        ShellError::ChangeDirFailure(args.to_string())
    })
}

/// `MD path`
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] for any switch
/// * [`ShellError::MakeDirFailure`] if the directory cannot be created
pub fn cmd_mkdir(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let args = args.trim();
    reject_remaining(args)?;
    ctx.fs.make_dir(args).map_err(|e| {
        log::debug!("MD {args}: {e}");
        ShellError::MakeDirFailure(args.to_string())
    })
}

/// `RD path`
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] for any switch
/// * [`ShellError::RemoveDirFailure`] if the directory is missing, not
///   empty or current
pub fn cmd_rmdir(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let args = args.trim();
    reject_remaining(args)?;
    ctx.fs.remove_dir(args).map_err(|e| {
        log::debug!("RD {args}: {e}");
        ShellError::RemoveDirFailure(args.to_string())
    })
}
