//! Single-character console I/O.
//!
//! Commands never talk to the terminal directly. They read one byte at a
//! time and write text through a [`Console`], which lets prompts, the pager
//! and `CHOICE` be driven by a [`ScriptedConsole`] in tests.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};
use std::rc::Rc;

use console::{Key, Term};

/// Ctrl-C as read from the console.
pub const CTRL_C: u8 = 0x03;
/// Backspace.
pub const BACKSPACE: u8 = 0x08;
/// Horizontal tab.
pub const TAB: u8 = 0x09;
/// Carriage return, the byte Enter produces.
pub const ENTER: u8 = 0x0D;
/// DOS end-of-file marker.
pub const EOF_MARKER: u8 = 0x1A;

/// Rows assumed when the terminal size is unknown.
pub const DEFAULT_ROWS: usize = 25;

/// Byte-oriented console used by every command.
pub trait Console {
    /// Block for one byte of input. `None` means input is exhausted.
    ///
    /// Extended keys arrive as a `0` byte followed by their scan code.
    fn read_byte(&mut self) -> Option<u8>;

    /// Read a full line for the interactive prompt, without the line ending.
    fn read_line(&mut self) -> Option<String>;

    fn write(&mut self, text: &str);

    /// Write raw file contents. Bytes that are not UTF-8 are replaced.
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write(&String::from_utf8_lossy(bytes));
    }

    /// Visible rows, used to size pages.
    fn rows(&self) -> usize {
        DEFAULT_ROWS
    }
}

/// The process terminal.
///
/// Keys are read raw through [`console::Term`] when stdout is a terminal.
/// Piped input falls back to reading stdin byte by byte.
pub struct TermConsole {
    term: Term,
    pending: VecDeque<u8>,
}

impl TermConsole {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            pending: VecDeque::new(),
        }
    }

    fn key_bytes(key: Key) -> Vec<u8> {
        match key {
            Key::Char(c) if c.is_ascii() => vec![c as u8],
            Key::Enter => vec![ENTER],
            Key::Backspace => vec![BACKSPACE],
            Key::Tab => vec![TAB],
            Key::CtrlC => vec![CTRL_C],
            Key::Escape => vec![0x1B],
            Key::ArrowUp => vec![0, 0x48],
            Key::ArrowDown => vec![0, 0x50],
            Key::ArrowLeft => vec![0, 0x4B],
            Key::ArrowRight => vec![0, 0x4D],
            Key::Home => vec![0, 0x47],
            Key::End => vec![0, 0x4F],
            Key::Del => vec![0, 0x53],
            Key::Insert => vec![0, 0x52],
            Key::PageUp => vec![0, 0x49],
            Key::PageDown => vec![0, 0x51],
            _ => Vec::new(),
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn read_byte(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.pop_front() {
            return Some(byte);
        }

        if !self.term.is_term() {
            let mut byte = [0u8; 1];
            return match io::stdin().read(&mut byte) {
                Ok(1) => Some(if byte[0] == b'\n' { ENTER } else { byte[0] }),
                _ => None,
            };
        }

        loop {
            let key = match self.term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    log::debug!("Console read failed: {e}");
                    return None;
                }
            };
            let bytes = Self::key_bytes(key);
            if let Some((first, rest)) = bytes.split_first() {
                self.pending.extend(rest);
                return Some(*first);
            }
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            log::debug!("Console write failed: {e}");
        }
    }

    fn rows(&self) -> usize {
        if self.term.is_term() {
            usize::from(self.term.size().0)
        } else {
            DEFAULT_ROWS
        }
    }
}

/// A console fed from a byte queue that records everything written.
///
/// Clones share the same queue and output buffer, so a test can keep one
/// clone and hand the other to the shell.
#[derive(Debug, Clone)]
pub struct ScriptedConsole {
    input: Rc<RefCell<VecDeque<u8>>>,
    output: Rc<RefCell<String>>,
    rows: usize,
}

impl ScriptedConsole {
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: Rc::new(RefCell::new(input.iter().copied().collect())),
            output: Rc::new(RefCell::new(String::new())),
            rows: DEFAULT_ROWS,
        }
    }

    /// Use a different screen height.
    #[must_use]
    pub const fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Queue more input.
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.borrow_mut().extend(bytes);
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    /// Everything written so far, clearing the buffer.
    #[must_use]
    pub fn take_output(&self) -> String {
        std::mem::take(&mut *self.output.borrow_mut())
    }

    /// Input not consumed yet.
    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input.borrow().len()
    }
}

impl Console for ScriptedConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.borrow_mut().pop_front()
    }

    fn read_line(&mut self) -> Option<String> {
        let mut input = self.input.borrow_mut();
        if input.is_empty() {
            return None;
        }
        let mut line = Vec::new();
        while let Some(byte) = input.pop_front() {
            match byte {
                b'\n' => break,
                b'\r' => {
                    if input.front() == Some(&b'\n') {
                        input.pop_front();
                    }
                    break;
                }
                byte => line.push(byte),
            }
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn write(&mut self, text: &str) {
        self.output.borrow_mut().push_str(text);
    }

    fn rows(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_shares_buffers_between_clones() {
        let probe = ScriptedConsole::new(b"ab");
        let mut console = probe.clone();

        assert_eq!(console.read_byte(), Some(b'a'));
        console.write("hello");
        assert_eq!(probe.remaining_input(), 1);
        assert_eq!(probe.take_output(), "hello");
        assert_eq!(probe.output(), "");
        assert_eq!(console.read_byte(), Some(b'b'));
        assert_eq!(console.read_byte(), None);
    }

    #[test]
    fn test_scripted_read_line_handles_both_endings() {
        let mut console = ScriptedConsole::new(b"dir\r\necho hi\nlast");
        assert_eq!(console.read_line().as_deref(), Some("dir"));
        assert_eq!(console.read_line().as_deref(), Some("echo hi"));
        assert_eq!(console.read_line().as_deref(), Some("last"));
        assert_eq!(console.read_line(), None);
    }

    #[test]
    fn test_key_bytes_for_extended_keys() {
        assert_eq!(TermConsole::key_bytes(Key::Char('y')), vec![b'y']);
        assert_eq!(TermConsole::key_bytes(Key::Enter), vec![ENTER]);
        assert_eq!(TermConsole::key_bytes(Key::ArrowUp), vec![0, 0x48]);
        assert!(TermConsole::key_bytes(Key::Char('é')).is_empty());
    }
}
