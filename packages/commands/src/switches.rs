//! Argument and switch scanning.
//!
//! Switches may appear anywhere in a command's argument text. A recognized
//! switch is cut out of the text; whatever `/...` token is left afterwards
//! is an illegal switch.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::error::ShellError;

/// Remove every `/name` switch from `args`, ignoring case.
///
/// A switch only matches when it is followed by whitespace, another switch
/// or the end of the text, so `/W` does not match `/WP`.
pub fn scan_bool(args: &mut String, name: &str) -> bool {
    let mut found = false;
    let mut from = 0;

    while let Some(rel) = args[from..].find('/') {
        let start = from + rel;
        let end = start + 1 + name.len();
        let matched = args
            .get(start + 1..end)
            .is_some_and(|text| text.eq_ignore_ascii_case(name))
            && args[end..]
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c == '/');

        if matched {
            args.replace_range(start..end, "");
            found = true;
            from = start;
        } else {
            from = start + 1;
        }
    }

    if found {
        log::trace!("Switch /{name} present");
    }
    found
}

/// The first remaining `/...` token, if any.
#[must_use]
pub fn scan_remain(args: &str) -> Option<&str> {
    let start = args.find('/')?;
    args[start..].split_whitespace().next()
}

/// Fail with [`ShellError::IllegalSwitch`] if any switch is left.
///
/// # Errors
///
/// * If `args` still contains a `/...` token
pub fn reject_remaining(args: &str) -> Result<(), ShellError> {
    scan_remain(args).map_or(Ok(()), |switch| {
        Err(ShellError::IllegalSwitch(switch.to_string()))
    })
}

/// Split off the first argument. A quoted argument runs to the closing
/// quote and is returned without the quotes.
#[must_use]
pub fn strip_arg(args: &str) -> (&str, &str) {
    let args = args.trim_start();
    if let Some(quoted) = args.strip_prefix('"') {
        return match quoted.find('"') {
            Some(end) => (&quoted[..end], &quoted[end + 1..]),
            None => (quoted, ""),
        };
    }
    strip_word(args)
}

/// Split off the first whitespace-delimited word, quotes included.
#[must_use]
pub fn strip_word(args: &str) -> (&str, &str) {
    let args = args.trim_start();
    let end = args.find(char::is_whitespace).unwrap_or(args.len());
    (&args[..end], &args[end..])
}

/// Every argument, in order, as [`strip_arg`] splits them.
#[must_use]
pub fn split_args(mut args: &str) -> Vec<&str> {
    let mut out = Vec::new();
    loop {
        let (arg, rest) = strip_arg(args);
        if arg.is_empty() && rest.trim().is_empty() {
            return out;
        }
        out.push(arg);
        args = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_bool_removes_all_occurrences() {
        let mut args = "/w *.txt /W".to_string();
        assert!(scan_bool(&mut args, "W"));
        assert_eq!(args.trim(), "*.txt");
        assert!(!scan_bool(&mut args, "W"));
    }

    #[test]
    fn test_scan_bool_needs_a_boundary() {
        let mut args = "/WP *.*".to_string();
        assert!(!scan_bool(&mut args, "W"));
        assert!(scan_bool(&mut args, "WP"));

        let mut args = "/p/q x".to_string();
        assert!(scan_bool(&mut args, "P"));
        assert_eq!(args, "/q x");
        assert!(scan_bool(&mut args, "q"));
        assert_eq!(args, " x");
    }

    #[test]
    fn test_scan_remain_reports_leftover_switch() {
        assert_eq!(scan_remain("a.txt /X b"), Some("/X"));
        assert_eq!(scan_remain("a.txt"), None);
        assert!(matches!(
            reject_remaining("x /Z"),
            Err(ShellError::IllegalSwitch(s)) if s == "/Z"
        ));
    }

    #[test]
    fn test_strip_arg_handles_quotes() {
        assert_eq!(strip_arg("  \"long name.txt\" rest"), ("long name.txt", " rest"));
        assert_eq!(strip_arg("a b"), ("a", " b"));
        assert_eq!(strip_arg("\"open"), ("open", ""));
        assert_eq!(strip_arg("   "), ("", ""));
    }

    #[test]
    fn test_split_args() {
        assert_eq!(split_args(" a  \"b c\" d"), vec!["a", "b c", "d"]);
        assert!(split_args("  ").is_empty());
    }
}
