//! Destination-name substitution.
//!
//! A destination such as `*.BAK` or `X?Z*.DOC` is applied to every matched
//! source name. `?` takes the source character at the same position and `*`
//! takes the rest of the source half it sits in. The name half and the
//! extension half are substituted independently of each other.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::error::PatternError;
use crate::wildcard::{has_wildcards, split_name};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplateKind {
    /// Trailing path separator: the source name is appended verbatim.
    Directory,
    /// A file name, optionally with an extension half.
    Name {
        name: Vec<char>,
        ext: Option<Vec<char>>,
    },
}

/// A parsed destination template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTemplate {
    raw: String,
    prefix: String,
    kind: TemplateKind,
}

impl SubstitutionTemplate {
    /// Parse a destination as typed by the user.
    ///
    /// Anything up to the last `\` or `:` is kept as a literal directory
    /// prefix. A final component without `.` that contains `*` gets an
    /// implicit `*` extension.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let split = raw.rfind(['\\', ':']).map_or(0, |idx| idx + 1);
        let (prefix, file) = raw.split_at(split);

        let kind = if file.is_empty() && !prefix.is_empty() {
            TemplateKind::Directory
        } else {
            match file.rfind('.') {
                Some(idx) => TemplateKind::Name {
                    name: file[..idx].chars().collect(),
                    ext: Some(file[idx + 1..].chars().collect()),
                },
                None if file.contains('*') => TemplateKind::Name {
                    name: file.chars().collect(),
                    ext: Some(vec!['*']),
                },
                None => TemplateKind::Name {
                    name: file.chars().collect(),
                    ext: None,
                },
            }
        };

        Self {
            raw: raw.to_string(),
            prefix: prefix.to_string(),
            kind,
        }
    }

    /// The template as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the template names a directory (trailing separator).
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, TemplateKind::Directory)
    }

    /// Whether any substitution will happen.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        match &self.kind {
            TemplateKind::Directory => true,
            TemplateKind::Name { .. } => has_wildcards(&self.raw[self.prefix.len()..]),
        }
    }

    /// Whether the name half has a `*` preceded by literal text, which is
    /// when COPY needs a replacement offset from the source pattern.
    #[must_use]
    pub fn needs_offset(&self) -> bool {
        match &self.kind {
            TemplateKind::Name { name, .. } => name.iter().position(|&c| c == '*').is_some_and(|p| p > 0),
            TemplateKind::Directory => false,
        }
    }

    /// Produce the destination name for one matched source name.
    ///
    /// `star_offset` overrides where a name-half `*` starts copying from the
    /// source name; `None` copies from the `*`'s own position.
    #[must_use]
    pub fn apply(&self, source_name: &str, star_offset: Option<usize>) -> String {
        let mut out = self.prefix.clone();

        let (name, ext) = match &self.kind {
            TemplateKind::Directory => {
                out.push_str(source_name);
                return out;
            }
            TemplateKind::Name { name, ext } => (name, ext),
        };

        let Some(ext) = ext else {
            let source: Vec<char> = source_name.chars().collect();
            out.extend(substitute_part(name, &source, star_offset));
            return out;
        };

        let (source_name_part, source_ext_part) = split_name(source_name);
        let source_name_part: Vec<char> = source_name_part.chars().collect();
        let source_ext_part: Vec<char> = source_ext_part.unwrap_or("").chars().collect();

        out.extend(substitute_part(name, &source_name_part, star_offset));

        let new_ext = substitute_part(ext, &source_ext_part, None);
        let ext_is_wild = ext.iter().any(|&c| c == '*' || c == '?');
        if !(new_ext.is_empty() && ext_is_wild) {
            out.push('.');
            out.extend(new_ext);
        }

        log::trace!("Substituted {source_name} via {} -> {out}", self.raw);
        out
    }
}

/// Substitute one half of a template against the matching half of a source
/// name. `?` without a source character is dropped.
fn substitute_part(template: &[char], source: &[char], star_offset: Option<usize>) -> Vec<char> {
    let mut out = Vec::with_capacity(template.len() + source.len());

    for (i, &c) in template.iter().enumerate() {
        match c {
            '?' => {
                if let Some(&s) = source.get(i) {
                    out.push(s);
                }
            }
            '*' => {
                let from = star_offset.unwrap_or(i);
                if from < source.len() {
                    out.extend_from_slice(&source[from..]);
                }
                break;
            }
            c => out.push(c),
        }
    }

    out
}

/// Locate the first `*` in the final component of a source pattern.
///
/// The offset is counted in characters from the start of the final
/// component.
///
/// # Errors
///
/// * If there is no `*`, or the first `*` lies before the last separator
pub fn wildcard_offset(source_pattern: &str) -> Result<usize, PatternError> {
    let missing = || PatternError::MissingWildcardOffset(source_pattern.to_string());

    let star = source_pattern.find('*').ok_or_else(missing)?;
    let component_start = source_pattern.rfind('\\').map_or(0, |idx| idx + 1);
    if star < component_start {
        return Err(missing());
    }

    Ok(source_pattern[component_start..star].chars().count())
}
