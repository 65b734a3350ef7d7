//! Conditional execution and batch control: `IF`, `GOTO`, `SHIFT`, `CALL`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use dosshell_fs::Attributes;

use crate::context::ShellContext;
use crate::dispatch::execute_line;
use crate::error::ShellError;
use crate::switches::{strip_arg, strip_word};

/// What an `IF` tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `ERRORLEVEL n`: the last exit code is at least `n`.
    ErrorlevelAtLeast(u32),
    /// `a==b`, compared with case.
    StringEquals(String, String),
    /// `EXIST path`: at least one file matches.
    FileExists(String),
}

/// A parsed `IF` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement<'a> {
    pub condition: Condition,
    pub negated: bool,
    /// The command to run when the condition holds.
    pub command: &'a str,
}

fn strip_spaces_and_equals(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || c == '=')
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    text.get(..keyword.len())
        .filter(|head| head.eq_ignore_ascii_case(keyword))
        .map(|_| &text[keyword.len()..])
}

/// Parse the text after `IF`.
///
/// `NOT` toggles negation and may repeat, but only counts when followed by
/// whitespace or `=`.
///
/// # Errors
///
/// * [`ShellError::ErrorlevelMissingNumber`] / [`ShellError::ErrorlevelInvalidNumber`]
///   for a malformed `ERRORLEVEL` test
/// * [`ShellError::ExistMissingFilename`] for `EXIST` without a name
/// * [`ShellError::SyntaxError`] when a string comparison has no `==`
pub fn parse_if(args: &str) -> Result<IfStatement<'_>, ShellError> {
    let mut args = strip_spaces_and_equals(args);
    let mut negated = false;

    while let Some(rest) = strip_keyword(args, "NOT") {
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '=') {
            break;
        }
        args = strip_spaces_and_equals(rest);
        negated = !negated;
    }

    if let Some(rest) = strip_keyword(args, "ERRORLEVEL") {
        let (word, command) = strip_word(strip_spaces_and_equals(rest));
        let digits = word.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(ShellError::ErrorlevelMissingNumber);
        }
        if digits != word.len() {
            return Err(ShellError::ErrorlevelInvalidNumber);
        }
        let level = word.bytes().fold(0u32, |n, digit| {
            n.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        });
        return Ok(IfStatement {
            condition: Condition::ErrorlevelAtLeast(level),
            negated,
            command,
        });
    }

    if let Some(rest) = strip_keyword(args, "EXIST ") {
        let (path, command) = strip_arg(rest);
        if path.is_empty() {
            return Err(ShellError::ExistMissingFilename);
        }
        return Ok(IfStatement {
            condition: Condition::FileExists(path.to_string()),
            negated,
            command,
        });
    }

    let word_end = |text: &str| {
        text.find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(text.len())
    };

    let end1 = word_end(args);
    let word1 = &args[..end1];
    let after = &args[end1..];
    let equals = after.find('=').ok_or(ShellError::SyntaxError)?;
    let after = after[equals + 1..]
        .strip_prefix('=')
        .ok_or(ShellError::SyntaxError)?;
    let after = strip_spaces_and_equals(after);
    let end2 = word_end(after);
    let word2 = &after[..end2];
    let command = strip_spaces_and_equals(after.get(end2 + 1..).unwrap_or(""));

    Ok(IfStatement {
        condition: Condition::StringEquals(word1.to_string(), word2.to_string()),
        negated,
        command,
    })
}

impl Condition {
    /// Evaluate against the current interpreter state.
    ///
    /// # Errors
    ///
    /// * [`ShellError::IllegalPath`] if an `EXIST` name cannot be resolved
    pub fn evaluate(&self, ctx: &mut ShellContext) -> Result<bool, ShellError> {
        match self {
            Self::ErrorlevelAtLeast(level) => Ok(u32::from(ctx.errorlevel) >= *level),
            Self::StringEquals(a, b) => Ok(a == b),
            Self::FileExists(path) => {
                let full = ctx
                    .fs
                    .canonicalize(path)
                    .map_err(|_| ShellError::IllegalPath)?;
                let short = ctx.fs.to_short_path(&full, false).unwrap_or(full);
                Ok(ctx.fs.find_first(&short, Attributes::FILES_ONLY))
            }
        }
    }
}

/// `IF [NOT] condition command`
///
/// # Errors
///
/// * If the condition cannot be parsed
/// * [`ShellError::IllegalPath`] if an `EXIST` name cannot be resolved; the
///   command is not run either way
pub fn cmd_if(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let statement = parse_if(args)?;
    let holds = statement.condition.evaluate(ctx)? != statement.negated;
    log::debug!("IF {:?} negated={} -> {holds}", statement.condition, statement.negated);
    if holds {
        execute_line(ctx, statement.command);
    }
    Ok(())
}

/// `GOTO label`. Outside a batch file this does nothing.
///
/// # Errors
///
/// * [`ShellError::GotoMissingLabel`] without a label
/// * [`ShellError::LabelNotFound`] when the batch has no such label; the
///   batch carries on with its next line
pub fn cmd_goto(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let Some(batch) = ctx.batch_mut() else {
        return Ok(());
    };

    let args = args.trim_start();
    let label = args.strip_prefix(':').unwrap_or(args);
    let label = label.split_whitespace().next().unwrap_or("");
    if label.is_empty() {
        return Err(ShellError::GotoMissingLabel);
    }
    if !batch.goto(label) {
        return Err(ShellError::LabelNotFound(label.to_string()));
    }
    Ok(())
}

/// `SHIFT`
///
/// # Errors
///
/// Never; the signature matches the other commands.
pub fn cmd_shift(ctx: &mut ShellContext, _args: &str) -> Result<(), ShellError> {
    if let Some(batch) = ctx.batch_mut() {
        batch.shift();
    }
    Ok(())
}

/// `CALL command`. A batch file started by the command runs nested, and
/// the calling batch resumes when it ends.
///
/// # Errors
///
/// Never; failures of the called command are reported by the dispatcher.
pub fn cmd_call(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    ctx.call = true;
    execute_line(ctx, args);
    ctx.call = false;
    Ok(())
}
