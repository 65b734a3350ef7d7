//! Message catalog.
//!
//! Every user-visible string is looked up by key. Formats use positional
//! `{}` placeholders filled in order; configuration can override any key.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// Returned for keys that have neither an override nor a default.
pub const MESSAGE_NOT_FOUND: &str = "Message not Found!\n";

const DEFAULTS: &[(&str, &str)] = &[
    ("SHELL_ILLEGAL_PATH", "Illegal Path.\n"),
    ("SHELL_ILLEGAL_SWITCH", "Illegal switch: {}.\n"),
    ("SHELL_MISSING_PARAMETER", "Required parameter missing.\n"),
    ("SHELL_SYNTAXERROR", "The syntax of the command is incorrect.\n"),
    ("SHELL_EXECUTE_ILLEGAL_COMMAND", "Illegal command: {}.\n"),
    ("SHELL_EXECUTE_DRIVE_NOT_FOUND", "Drive {} does not exist!\n"),
    ("SHELL_CMD_FILE_NOT_FOUND", "File {} not found.\n"),
    ("SHELL_CMD_PAUSE", "Press any key to continue . . ."),
    ("SHELL_CMD_HELP", "If you want a list of all supported commands type help /all .\nA short list of the most often used commands:\n"),
    ("SHELL_CMD_ECHO_ON", "ECHO is on.\n"),
    ("SHELL_CMD_ECHO_OFF", "ECHO is off.\n"),
    ("SHELL_CMD_CHDIR_ERROR", "Unable to change to: {}.\n"),
    ("SHELL_CMD_MKDIR_ERROR", "Unable to make: {}.\n"),
    ("SHELL_CMD_RMDIR_ERROR", "Unable to remove: {}.\n"),
    ("SHELL_CMD_DEL_ERROR", "Unable to delete: {}.\n"),
    ("SHELL_CMD_DEL_SURE", "All files in directory will be deleted!\nAre you sure (Y/N)?"),
    ("SHELL_CMD_DEL_CONFIRM", "Delete {} (Y/N)?"),
    ("SHELL_CMD_RENAME_ERROR", "Unable to rename: {}.\n"),
    ("SHELL_CMD_SET_NOT_SET", "Environment variable {} not defined.\n"),
    ("SHELL_CMD_IF_EXIST_MISSING_FILENAME", "IF EXIST: Missing filename.\n"),
    ("SHELL_CMD_IF_ERRORLEVEL_MISSING_NUMBER", "IF ERRORLEVEL: Missing number.\n"),
    ("SHELL_CMD_IF_ERRORLEVEL_INVALID_NUMBER", "IF ERRORLEVEL: Invalid number.\n"),
    ("SHELL_CMD_GOTO_MISSING_LABEL", "No label supplied to GOTO command.\n"),
    ("SHELL_CMD_GOTO_LABEL_NOT_FOUND", "GOTO: Label {} not found.\n"),
    ("SHELL_CMD_DIR_VOLUME", " Volume in drive {} is {}\n"),
    ("SHELL_CMD_DIR_INTRO", " Directory of {}\n"),
    ("SHELL_CMD_DIR_BYTES_USED", "{} File(s) {} Bytes\n"),
    ("SHELL_CMD_DIR_BYTES_FREE", "{} Dir(s)  {} Bytes free\n"),
    ("SHELL_CMD_DIR_FILES_LISTED", "Total files listed:\n"),
    ("SHELL_CMD_COPY_FAILURE", "Copy failure : {}.\n"),
    ("SHELL_CMD_COPY_SUCCESS", "   {} file(s) copied.\n"),
    ("SHELL_CMD_COPY_CONFIRM", "Overwrite {} (Yes/No/All)?"),
    ("SHELL_CMD_COPY_ERROR", "Copy error: {}.\n"),
    ("SHELL_CMD_COPY_SELF", "File cannot be copied onto itself\n"),
    ("SHELL_CMD_CANCELLED", "^C\n"),
    ("SHELL_CMD_CALL_HELP", "Starts a batch file from within another batch file.\n"),
    ("SHELL_CMD_CALL_HELP_LONG", "CALL [drive:][path]filename [batch-parameters]\n"),
    ("SHELL_CMD_CHDIR_HELP", "Displays/changes the current directory.\n"),
    ("SHELL_CMD_CHDIR_HELP_LONG", "CHDIR [drive:][path]\nCHDIR [..]\nCD [drive:][path]\nCD [..]\n"),
    ("SHELL_CMD_CHOICE_HELP", "Waits for a keypress and sets ERRORLEVEL.\n"),
    ("SHELL_CMD_CHOICE_HELP_LONG", "CHOICE [/C:choices] [/N] [/S] text\n  /C[:]choices  -  Specifies allowable keys.  Default is: yn.\n  /N  -  Do not display the choices at end of prompt.\n  /S  -  Enables case-sensitive choices to be selected.\n  text  -  The text to display as a prompt.\n"),
    ("SHELL_CMD_COPY_HELP", "Copies one or more files.\n"),
    ("SHELL_CMD_COPY_HELP_LONG", "COPY [/Y | /-Y] source [+source [+ ...]] [destination]\n  source       Specifies the file or files to be copied.\n  destination  Specifies the directory and/or filename for the new file(s).\n  /Y           Suppresses prompting to confirm you want to overwrite an\n               existing destination file.\n  /-Y          Causes prompting to confirm you want to overwrite an\n               existing destination file.\n"),
    ("SHELL_CMD_DELETE_HELP", "Removes one or more files.\n"),
    ("SHELL_CMD_DELETE_HELP_LONG", "DEL [/P] [/F] [/Q] names\nERASE [/P] [/F] [/Q] names\n  names  Specifies a list of one or more files or directories.\n  /P     Prompts for confirmation before deleting each file.\n  /F     Force deleting of read-only files.\n  /Q     Quiet mode, do not ask if ok to delete on global wildcard.\n"),
    ("SHELL_CMD_DIR_HELP", "Displays a list of files and subdirectories in a directory.\n"),
    ("SHELL_CMD_DIR_HELP_LONG", "DIR [drive:][path][filename] [/[W|B]] [/S] [/P] [/A[[:]attributes]] [/O[[:]sortorder]]\n  /W  Uses wide list format.\n  /B  Uses bare format (no heading information or summary).\n  /S  Displays files in specified directory and all subdirectories.\n  /P  Pauses after each screenful of information.\n  /Z  Displays short names only.\n  /A  Displays files with specified attributes:\n      D Directories  R Read-only files  H Hidden files\n      S System files  A Files ready for archiving  - Prefix meaning not\n  /O  List by files in sorted order:\n      N By name  S By size  E By extension  D By date  G Group directories first\n      - Prefix to reverse order\n"),
    ("SHELL_CMD_ECHO_HELP", "Displays messages and enables/disables command echoing.\n"),
    ("SHELL_CMD_ECHO_HELP_LONG", "ECHO [ON | OFF]\nECHO [message]\n"),
    ("SHELL_CMD_EXIT_HELP", "Exits from the command shell.\n"),
    ("SHELL_CMD_EXIT_HELP_LONG", "EXIT\n"),
    ("SHELL_CMD_GOTO_HELP", "Jumps to a labeled line in a batch program.\n"),
    ("SHELL_CMD_GOTO_HELP_LONG", "GOTO label\n"),
    ("SHELL_CMD_HELP_HELP", "Shows the help screen.\n"),
    ("SHELL_CMD_HELP_HELP_LONG", "HELP [/ALL]\n"),
    ("SHELL_CMD_IF_HELP", "Performs conditional processing in batch programs.\n"),
    ("SHELL_CMD_IF_HELP_LONG", "IF [NOT] ERRORLEVEL number command\nIF [NOT] string1==string2 command\nIF [NOT] EXIST filename command\n"),
    ("SHELL_CMD_MKDIR_HELP", "Creates a directory.\n"),
    ("SHELL_CMD_MKDIR_HELP_LONG", "MKDIR [drive:][path]\nMD [drive:][path]\n"),
    ("SHELL_CMD_PAUSE_HELP", "Waits for a keypress to continue.\n"),
    ("SHELL_CMD_PAUSE_HELP_LONG", "PAUSE\n"),
    ("SHELL_CMD_REM_HELP", "Adds comments in a batch program.\n"),
    ("SHELL_CMD_REM_HELP_LONG", "REM [comment]\n"),
    ("SHELL_CMD_RENAME_HELP", "Renames one or more files.\n"),
    ("SHELL_CMD_RENAME_HELP_LONG", "RENAME [drive:][path]filename1 filename2\nREN [drive:][path]filename1 filename2\n"),
    ("SHELL_CMD_RMDIR_HELP", "Removes a directory.\n"),
    ("SHELL_CMD_RMDIR_HELP_LONG", "RMDIR [drive:][path]\nRD [drive:][path]\n"),
    ("SHELL_CMD_SET_HELP", "Changes environment variables.\n"),
    ("SHELL_CMD_SET_HELP_LONG", "SET [variable=[string]]\n"),
    ("SHELL_CMD_SHIFT_HELP", "Leftshift commandline parameters in a batch script.\n"),
    ("SHELL_CMD_SHIFT_HELP_LONG", "SHIFT\n"),
    ("SHELL_CMD_TYPE_HELP", "Display the contents of a text-file.\n"),
    ("SHELL_CMD_TYPE_HELP_LONG", "TYPE [drive:][path][filename]\n"),
];

/// Localizable messages with English defaults.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    overrides: BTreeMap<String, String>,
}

impl MessageCatalog {
    /// Build a catalog on top of the built-in English messages.
    #[must_use]
    pub const fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Whether the key has an override or a default.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.overrides.contains_key(key) || DEFAULTS.iter().any(|(k, _)| *k == key)
    }

    /// The raw format string for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        if let Some(text) = self.overrides.get(key) {
            return text;
        }
        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map_or_else(
                || {
                    log::warn!("Missing message {key}");
                    MESSAGE_NOT_FOUND
                },
                |(_, text)| *text,
            )
    }

    /// Format a message, filling `{}` placeholders with `args` in order.
    /// Placeholders without an argument are left empty.
    #[must_use]
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        let template = self.get(key);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template;

        while let Some(idx) = rest.find("{}") {
            out.push_str(&rest[..idx]);
            if let Some(arg) = args.next() {
                let _ = write!(out, "{arg}");
            }
            rest = &rest[idx + 2..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_formatting() {
        let catalog = MessageCatalog::default();
        assert_eq!(
            catalog.format("SHELL_CMD_FILE_NOT_FOUND", &[&"X.TXT"]),
            "File X.TXT not found.\n"
        );
        assert_eq!(
            catalog.format("SHELL_CMD_DIR_VOLUME", &[&'C', &"DATA"]),
            " Volume in drive C is DATA\n"
        );
        assert_eq!(catalog.format("SHELL_CMD_COPY_SUCCESS", &[&3]), "   3 file(s) copied.\n");
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("SHELL_ILLEGAL_PATH".to_string(), "Pfad ungültig.\n".to_string());
        let catalog = MessageCatalog::new(overrides);
        assert_eq!(catalog.get("SHELL_ILLEGAL_PATH"), "Pfad ungültig.\n");
    }

    #[test]
    fn test_missing_key_and_placeholders() {
        let catalog = MessageCatalog::default();
        assert!(!catalog.contains("NOPE"));
        assert_eq!(catalog.get("NOPE"), MESSAGE_NOT_FOUND);
        assert_eq!(catalog.format("SHELL_CMD_DIR_VOLUME", &[]), " Volume in drive  is \n");
    }
}
