//! Case-insensitive `*` / `?` matching.
//!
//! A DOS pattern has exactly two special glyphs. `?` matches one character and
//! `*` matches the rest of a name segment; everything else is literal. The
//! matching itself is delegated to `globset` after every other glob
//! metacharacter has been escaped.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use globset::{GlobBuilder, GlobMatcher};

use crate::error::PatternError;

/// One token of a parsed wildcard pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternToken {
    /// A character that must match literally (ignoring case).
    Literal(char),
    /// `?` - exactly one character.
    AnyOne,
    /// `*` - the remainder of the segment.
    AnyRest,
}

/// Options supplied by the caller for a single match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match against long names instead of 8.3 short names.
    pub long_names: bool,
    /// Treat a pattern without `.` as `pattern.*`.
    pub expand_dot: bool,
}

/// Matcher for one half (name or extension) of a pattern.
#[derive(Debug, Clone)]
enum PartMatcher {
    Empty,
    Any,
    Glob(GlobMatcher),
}

impl PartMatcher {
    fn compile(pattern: &str, part: &str) -> Result<Self, PatternError> {
        if part.is_empty() {
            return Ok(Self::Empty);
        }
        if part == "*" {
            return Ok(Self::Any);
        }

        let glob = GlobBuilder::new(&escape_glob(part))
            .case_insensitive(true)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|e| PatternError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })?;

        Ok(Self::Glob(glob.compile_matcher()))
    }

    fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Empty => candidate.is_empty(),
            Self::Any => true,
            Self::Glob(matcher) => matcher.is_match(candidate),
        }
    }
}

/// A parsed DOS wildcard pattern for a single path component.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    raw: String,
    tokens: Vec<PatternToken>,
    whole: PartMatcher,
    name: PartMatcher,
    ext: Option<PartMatcher>,
}

impl WildcardPattern {
    /// Parse a pattern such as `*.TXT` or `REPORT?.DO?`.
    ///
    /// # Errors
    ///
    /// * If the escaped pattern cannot be compiled
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        let raw = raw.trim_matches('"');
        let tokens = raw
            .chars()
            .map(|c| match c {
                '?' => PatternToken::AnyOne,
                '*' => PatternToken::AnyRest,
                c => PatternToken::Literal(c),
            })
            .collect();

        let (name_part, ext_part) = split_name(raw);
        let ext = match ext_part {
            Some(ext) => Some(PartMatcher::compile(raw, ext)?),
            None => None,
        };

        Ok(Self {
            raw: raw.to_string(),
            tokens,
            whole: PartMatcher::compile(raw, raw)?,
            name: PartMatcher::compile(raw, name_part)?,
            ext,
        })
    }

    /// The pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed token sequence.
    #[must_use]
    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Whether the pattern contains `*` or `?`.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| !matches!(t, PatternToken::Literal(_)))
    }

    /// Decide whether `candidate` matches this pattern.
    ///
    /// Never fails; anything that does not match returns `false`.
    #[must_use]
    pub fn matches(&self, candidate: &str, options: MatchOptions) -> bool {
        if options.long_names {
            self.matches_long(candidate, options.expand_dot)
        } else {
            self.matches_short(candidate, options.expand_dot)
        }
    }

    fn matches_short(&self, candidate: &str, expand_dot: bool) -> bool {
        let (name, ext) = split_name(candidate);
        let ext = ext.unwrap_or("");

        if !self.name.is_match(name) {
            return false;
        }

        match &self.ext {
            Some(matcher) => matcher.is_match(ext),
            None => expand_dot || ext.is_empty(),
        }
    }

    fn matches_long(&self, candidate: &str, expand_dot: bool) -> bool {
        if self.whole.is_match(candidate) {
            return true;
        }

        match &self.ext {
            // `foo.*` also matches `foo`
            Some(PartMatcher::Any) => !candidate.contains('.') && self.name.is_match(candidate),
            Some(_) => false,
            None => {
                expand_dot && {
                    let (name, _) = split_name(candidate);
                    self.whole.is_match(name)
                }
            }
        }
    }
}

/// Whether a string contains either wildcard glyph.
#[must_use]
pub fn has_wildcards(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Split a file name at its last `.` into name and extension.
///
/// `.` and `..` have no extension.
pub(crate) fn split_name(name: &str) -> (&str, Option<&str>) {
    if name == "." || name == ".." {
        return (name, None);
    }
    match name.rfind('.') {
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
        None => (name, None),
    }
}

/// Escape every glob metacharacter except `*` and `?`.
fn escape_glob(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            c => escaped.push(c),
        }
    }
    escaped
}
