//! 8.3 short-name generation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashSet;

const SPECIAL_CHARS: &str = "!#$%&'()-@^_`{}~";

fn is_short_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(c)
}

/// Whether a name already fits the 8.3 form, ignoring case.
#[must_use]
pub fn is_short_name(name: &str) -> bool {
    if name == "." || name == ".." {
        return true;
    }

    let (base, ext) = match name.split_once('.') {
        Some((base, ext)) => (base, ext),
        None => (name, ""),
    };

    !base.is_empty()
        && base.len() <= 8
        && ext.len() <= 3
        && !ext.contains('.')
        && base.chars().all(is_short_char)
        && ext.chars().all(is_short_char)
}

fn clean(part: &str) -> String {
    part.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| {
            if is_short_char(c) {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Assign a unique short name to every long name of one directory.
///
/// Names that already fit keep their upper-cased form; the rest become
/// `BASE~N.EXT` with the lowest unused `N`.
#[must_use]
pub fn assign_short_names(long_names: &[&str]) -> Vec<String> {
    let mut used: HashSet<String> = long_names
        .iter()
        .filter(|n| is_short_name(n))
        .map(|n| n.to_ascii_uppercase())
        .collect();

    long_names
        .iter()
        .map(|&long| {
            if is_short_name(long) {
                return long.to_ascii_uppercase();
            }

            let trimmed = long.trim_start_matches('.');
            let (base, ext) = match trimmed.rfind('.') {
                Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
                None => (trimmed, ""),
            };
            let base = clean(base);
            let ext: String = clean(ext).chars().take(3).collect();
            let base = if base.is_empty() { "_".to_string() } else { base };

            let mut n = 1u32;
            loop {
                let tail = format!("~{n}");
                let keep = 8usize.saturating_sub(tail.len());
                let stem: String = base.chars().take(keep).collect();
                let candidate = if ext.is_empty() {
                    format!("{stem}{tail}")
                } else {
                    format!("{stem}{tail}.{ext}")
                };
                if used.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}
