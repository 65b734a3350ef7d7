//! Confirmation prompts.
//!
//! Whole-directory deletes and overwrites ask a question that must be
//! answered with a letter followed by Enter. The answer is read one byte at
//! a time through a small state machine: [`PromptState::step`] is a pure
//! transition function and [`confirm`] drives it against a [`Console`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::console::{BACKSPACE, CTRL_C, Console, ENTER, TAB};
use crate::error::ShellError;

/// Which answers a prompt accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// `(Y/N)?`
    YesNo,
    /// `(Yes/No/All)?`
    YesNoAll,
}

/// A final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    All,
}

/// The first letter typed, before Enter commits it. Later letters are
/// echoed but do not change the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tentative {
    Answer(Answer),
    Unrecognized,
}

/// State of one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    AwaitingInput,
    /// A letter was typed and is waiting for Enter.
    Answered(Tentative),
    Confirmed(Answer),
    Cancelled,
    /// Go back to [`PromptState::AwaitingInput`], printing the question again
    /// when `reprompt` is set.
    Retry { reprompt: bool },
}

impl PromptState {
    /// Feed one input byte, returning the next state and the text to echo.
    ///
    /// Ctrl-C echoes nothing here; the caller reports the cancellation.
    #[must_use]
    pub fn step(self, kind: PromptKind, byte: u8) -> (Self, String) {
        match self {
            Self::AwaitingInput | Self::Retry { .. } => match byte {
                CTRL_C => (Self::Cancelled, String::new()),
                ENTER => (Self::Retry { reprompt: true }, "\n".to_string()),
                BACKSPACE | TAB => (Self::Retry { reprompt: false }, String::new()),
                byte => {
                    let (tentative, echo) = classify(kind, byte);
                    (Self::Answered(tentative), echo)
                }
            },
            Self::Answered(tentative) => match byte {
                CTRL_C => (Self::Cancelled, String::new()),
                ENTER => match tentative {
                    Tentative::Answer(answer) => (Self::Confirmed(answer), "\n".to_string()),
                    Tentative::Unrecognized => (Self::Retry { reprompt: true }, "\n".to_string()),
                },
                BACKSPACE => (Self::Retry { reprompt: false }, "\u{8} \u{8}".to_string()),
                TAB => (Self::Retry { reprompt: false }, String::new()),
                byte => (Self::Answered(tentative), char::from(byte).to_string()),
            },
            done @ (Self::Confirmed(_) | Self::Cancelled) => (done, String::new()),
        }
    }

    /// Whether no more input will be consumed.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Cancelled)
    }
}

fn classify(kind: PromptKind, byte: u8) -> (Tentative, String) {
    match (kind, byte.to_ascii_uppercase()) {
        (_, b'Y') => (Tentative::Answer(Answer::Yes), "Y".to_string()),
        (_, b'N') => (Tentative::Answer(Answer::No), "N".to_string()),
        (PromptKind::YesNoAll, b'A') => (Tentative::Answer(Answer::All), "A".to_string()),
        _ => (Tentative::Unrecognized, char::from(byte).to_string()),
    }
}

/// Print `question` and read an answer.
///
/// # Arguments
///
/// * `console` - Where the question is printed and the answer read
/// * `question` - Prompt text, printed again after an empty or unknown answer
/// * `kind` - Which answers are accepted
///
/// # Errors
///
/// * [`ShellError::Cancelled`] on Ctrl-C or when input runs out
pub fn confirm(
    console: &mut dyn Console,
    question: &str,
    kind: PromptKind,
) -> Result<Answer, ShellError> {
    console.write(question);
    let mut state = PromptState::AwaitingInput;

    loop {
        let Some(byte) = console.read_byte() else {
            log::debug!("Input ended while waiting for an answer");
            return Err(ShellError::Cancelled);
        };

        let (next, echo) = state.step(kind, byte);
        console.write(&echo);
        log::trace!("Prompt {state:?} + {byte:#04x} -> {next:?}");

        state = match next {
            PromptState::Confirmed(answer) => return Ok(answer),
            PromptState::Cancelled => return Err(ShellError::Cancelled),
            PromptState::Retry { reprompt } => {
                if reprompt {
                    console.write(question);
                }
                PromptState::AwaitingInput
            }
            other => other,
        };
    }
}

/// Read a single keypress that must be one of `keys`, echoing it followed
/// by a newline. Returns the index of the key in `keys`.
///
/// # Errors
///
/// * [`ShellError::Cancelled`] on Ctrl-C or when input runs out
pub fn read_choice(
    console: &mut dyn Console,
    keys: &str,
    case_sensitive: bool,
) -> Result<usize, ShellError> {
    loop {
        let byte = console.read_byte().ok_or(ShellError::Cancelled)?;
        match byte {
            CTRL_C => return Err(ShellError::Cancelled),
            0 => continue,
            _ => {}
        }
        let typed = char::from(byte);
        let found = keys.chars().enumerate().find(|(_, key)| {
            if case_sensitive {
                *key == typed
            } else {
                key.eq_ignore_ascii_case(&typed)
            }
        });
        if let Some((index, key)) = found {
            console.write(&format!("{key}\n"));
            return Ok(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn run(input: &[u8], kind: PromptKind) -> (Result<Answer, ShellError>, String) {
        let probe = ScriptedConsole::new(input);
        let mut console = probe.clone();
        let result = confirm(&mut console, "Sure?", kind);
        (result, probe.output())
    }

    #[test]
    fn test_yes_then_enter_confirms() {
        let (result, output) = run(b"y\r", PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::Yes);
        assert_eq!(output, "Sure?Y\n");
    }

    #[test]
    fn test_yes_then_ctrl_c_cancels() {
        let (result, _) = run(&[b'Y', CTRL_C], PromptKind::YesNo);
        assert!(matches!(result, Err(ShellError::Cancelled)));
    }

    #[test]
    fn test_backspace_returns_to_awaiting_input() {
        let (state, echo) = PromptState::Answered(Tentative::Answer(Answer::Yes))
            .step(PromptKind::YesNo, BACKSPACE);
        assert_eq!(state, PromptState::Retry { reprompt: false });
        assert_eq!(echo, "\u{8} \u{8}");

        let (state, _) = PromptState::AwaitingInput.step(PromptKind::YesNo, BACKSPACE);
        assert_eq!(state, PromptState::Retry { reprompt: false });
        assert!(!state.is_final());

        let (result, output) = run(&[b'y', BACKSPACE, b'n', ENTER], PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::No);
        assert_eq!(output, "Sure?Y\u{8} \u{8}N\n");
    }

    #[test]
    fn test_enter_alone_reprompts() {
        let (result, output) = run(b"\rn\r", PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::No);
        assert_eq!(output, "Sure?\nSure?N\n");
    }

    #[test]
    fn test_unrecognized_letter_never_confirms() {
        let (result, output) = run(b"x\ry\r", PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::Yes);
        assert_eq!(output, "Sure?x\nSure?Y\n");

        let (result, output) = run(b"yx\r", PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::Yes);
        assert_eq!(output, "Sure?Yx\n");
    }

    #[test]
    fn test_all_only_for_overwrite_prompt() {
        let (result, _) = run(b"a\r", PromptKind::YesNoAll);
        assert_eq!(result.unwrap(), Answer::All);

        let (result, output) = run(b"a\rn\r", PromptKind::YesNo);
        assert_eq!(result.unwrap(), Answer::No);
        assert_eq!(output, "Sure?a\nSure?N\n");
    }

    #[test]
    fn test_read_choice_skips_invalid_keys() {
        let probe = ScriptedConsole::new(b"xzb");
        let mut console = probe.clone();
        assert_eq!(read_choice(&mut console, "ABC", false).unwrap(), 1);
        assert_eq!(probe.output(), "B\n");

        let probe = ScriptedConsole::new(b"Aa");
        let mut console = probe.clone();
        assert_eq!(read_choice(&mut console, "ab", true).unwrap(), 0);
        assert_eq!(probe.output(), "a\n");

        let mut console = ScriptedConsole::new(&[CTRL_C]);
        assert!(matches!(
            read_choice(&mut console, "YN", false),
            Err(ShellError::Cancelled)
        ));
    }
}
