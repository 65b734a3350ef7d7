//! Error types for the command engine.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt::Display;

use dosshell_config::MessageCatalog;
use dosshell_fs::FsError;
use dosshell_pattern::PatternError;
use thiserror::Error;

/// Errors a built-in command can end with.
///
/// None of these are fatal. The dispatcher prints one message per error
/// through [`ShellError::render`] and carries on with the next line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Illegal path")]
    IllegalPath,

    #[error("Illegal switch: {0}")]
    IllegalSwitch(String),

    #[error("Required parameter missing")]
    MissingParameter,

    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Copy failure: {0}")]
    CopyFailure(String),

    #[error("Unable to rename {0}")]
    RenameFailure(String),

    #[error("Unable to delete {0}")]
    DeleteFailure(String),

    #[error("Syntax error")]
    SyntaxError,

    /// The user pressed Ctrl-C.
    #[error("Cancelled")]
    Cancelled,

    #[error("IF ERRORLEVEL without a number")]
    ErrorlevelMissingNumber,

    #[error("IF ERRORLEVEL with an invalid number")]
    ErrorlevelInvalidNumber,

    #[error("IF EXIST without a file name")]
    ExistMissingFilename,

    #[error("GOTO without a label")]
    GotoMissingLabel,

    #[error("Label {0} not found")]
    LabelNotFound(String),

    #[error("Illegal command: {0}")]
    IllegalCommand(String),

    #[error("File cannot be copied onto itself")]
    SelfCopy,

    #[error("Drive {0} does not exist")]
    DriveNotFound(char),

    #[error("Unable to change to {0}")]
    ChangeDirFailure(String),

    #[error("Unable to make {0}")]
    MakeDirFailure(String),

    #[error("Unable to remove {0}")]
    RemoveDirFailure(String),

    #[error("Environment variable {0} not defined")]
    NotSet(String),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ShellError {
    /// The message catalog key this error is reported with.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::IllegalPath | Self::Pattern(_) | Self::Fs(_) => "SHELL_ILLEGAL_PATH",
            Self::IllegalSwitch(_) => "SHELL_ILLEGAL_SWITCH",
            Self::MissingParameter => "SHELL_MISSING_PARAMETER",
            Self::FileNotFound(_) => "SHELL_CMD_FILE_NOT_FOUND",
            Self::CopyFailure(_) => "SHELL_CMD_COPY_FAILURE",
            Self::RenameFailure(_) => "SHELL_CMD_RENAME_ERROR",
            Self::DeleteFailure(_) => "SHELL_CMD_DEL_ERROR",
            Self::SyntaxError => "SHELL_SYNTAXERROR",
            Self::Cancelled => "SHELL_CMD_CANCELLED",
            Self::ErrorlevelMissingNumber => "SHELL_CMD_IF_ERRORLEVEL_MISSING_NUMBER",
            Self::ErrorlevelInvalidNumber => "SHELL_CMD_IF_ERRORLEVEL_INVALID_NUMBER",
            Self::ExistMissingFilename => "SHELL_CMD_IF_EXIST_MISSING_FILENAME",
            Self::GotoMissingLabel => "SHELL_CMD_GOTO_MISSING_LABEL",
            Self::LabelNotFound(_) => "SHELL_CMD_GOTO_LABEL_NOT_FOUND",
            Self::IllegalCommand(_) => "SHELL_EXECUTE_ILLEGAL_COMMAND",
            Self::SelfCopy => "SHELL_CMD_COPY_SELF",
            Self::DriveNotFound(_) => "SHELL_EXECUTE_DRIVE_NOT_FOUND",
            Self::ChangeDirFailure(_) => "SHELL_CMD_CHDIR_ERROR",
            Self::MakeDirFailure(_) => "SHELL_CMD_MKDIR_ERROR",
            Self::RemoveDirFailure(_) => "SHELL_CMD_RMDIR_ERROR",
            Self::NotSet(_) => "SHELL_CMD_SET_NOT_SET",
        }
    }

    /// Format the user-visible message for this error.
    #[must_use]
    pub fn render(&self, messages: &MessageCatalog) -> String {
        let key = self.message_key();
        match self {
            Self::IllegalSwitch(arg)
            | Self::FileNotFound(arg)
            | Self::CopyFailure(arg)
            | Self::RenameFailure(arg)
            | Self::DeleteFailure(arg)
            | Self::LabelNotFound(arg)
            | Self::IllegalCommand(arg)
            | Self::ChangeDirFailure(arg)
            | Self::MakeDirFailure(arg)
            | Self::RemoveDirFailure(arg)
            | Self::NotSet(arg) => messages.format(key, &[arg as &dyn Display]),
            Self::DriveNotFound(drive) => messages.format(key, &[drive as &dyn Display]),
            Self::Fs(FsError::NotFound(path)) => {
                messages.format("SHELL_CMD_FILE_NOT_FOUND", &[path as &dyn Display])
            }
            Self::Fs(FsError::InvalidDrive(drive)) => {
                messages.format("SHELL_EXECUTE_DRIVE_NOT_FOUND", &[drive as &dyn Display])
            }
            _ => messages.get(key).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_fills_argument() {
        let messages = MessageCatalog::new(BTreeMap::new());
        let err = ShellError::FileNotFound("X.TXT".to_string());
        assert_eq!(err.render(&messages), "File X.TXT not found.\n");
    }

    #[test]
    fn test_render_maps_fs_errors() {
        let messages = MessageCatalog::new(BTreeMap::new());
        assert_eq!(
            ShellError::from(FsError::InvalidDrive('Q')).render(&messages),
            "Drive Q does not exist!\n"
        );
        assert_eq!(
            ShellError::from(FsError::IllegalPath("C:\\<".to_string())).render(&messages),
            "Illegal Path.\n"
        );
    }

    #[test]
    fn test_cancelled_renders_caret_c() {
        let messages = MessageCatalog::new(BTreeMap::new());
        assert_eq!(ShellError::Cancelled.render(&messages), "^C\n");
    }
}
