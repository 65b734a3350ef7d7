//! DOS wildcard handling for dosshell.
//!
//! This crate provides the pure string algorithms behind the file commands:
//!
//! * Case-insensitive `*` / `?` matching against short (8.3) or long names
//! * Destination-name substitution (`ren *.txt *.bak`, `copy ab*.c x*.d`)
//! * Search-pattern normalisation (`.` → `*.*`, `.txt` → `*.txt`)
//!
//! # Example
//!
//! ```rust,ignore
//! use dosshell_pattern::{MatchOptions, SubstitutionTemplate, WildcardPattern};
//!
//! let pattern = WildcardPattern::new("?EST.TXT")?;
//! assert!(pattern.matches("test.txt", MatchOptions::default()));
//!
//! let template = SubstitutionTemplate::parse("best.*");
//! assert_eq!(template.apply("test.txt", None), "best.txt");
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod expand;
mod template;
mod wildcard;

pub use error::PatternError;
pub use expand::{append_all_files, ensure_extension, expand_dot, split_last_component};
pub use template::{SubstitutionTemplate, wildcard_offset};
pub use wildcard::{MatchOptions, PatternToken, WildcardPattern, has_wildcards};
