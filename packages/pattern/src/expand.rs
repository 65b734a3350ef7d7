//! Search-pattern normalisation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Expand a leading dot into a wildcard name.
///
/// * `.` becomes `*.*`
/// * `.ext` becomes `*.ext`
/// * `..` and `.\...` are left alone
#[must_use]
pub fn expand_dot(args: &str) -> String {
    let mut chars = args.chars();
    if chars.next() != Some('.') {
        return args.to_string();
    }

    match chars.next() {
        None => "*.*".to_string(),
        Some('.' | '\\') => args.to_string(),
        Some(_) => format!("*{args}"),
    }
}

/// Append `*.*` to an empty argument or one ending in `\` or `:`.
#[must_use]
pub fn append_all_files(args: &str) -> String {
    if args.is_empty() || args.ends_with(['\\', ':']) {
        format!("{args}*.*")
    } else {
        args.to_string()
    }
}

/// Append `.*` when the final component has no extension separator.
#[must_use]
pub fn ensure_extension(args: &str) -> String {
    let (_, last) = split_last_component(args);
    if last.contains('.') {
        args.to_string()
    } else {
        format!("{args}.*")
    }
}

/// Split a path into its directory part (including the trailing separator)
/// and its final component.
#[must_use]
pub fn split_last_component(path: &str) -> (&str, &str) {
    match path.rfind(['\\', ':']) {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}
