//! Small built-ins: `ECHO`, `REM`, `PAUSE`, `SET`, `TYPE`, `CHOICE`, `HELP`
//! and `EXIT`.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::console::{CTRL_C, ENTER, EOF_MARKER};
use crate::context::{Environment, ShellContext};
use crate::dispatch::{COMMAND_REGISTRY, lookup, print_help};
use crate::error::ShellError;
use crate::prompt::read_choice;
use crate::stream::InputStream;
use crate::switches::{scan_bool, scan_remain, strip_arg};

/// Lines printed by `HELP` before it pauses.
const HELP_PAGE_LINES: usize = 24;

/// `ECHO [ON|OFF|text]`
///
/// # Errors
///
/// Never.
pub fn cmd_echo(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    if args.is_empty() {
        let key = if ctx.echo {
            "SHELL_CMD_ECHO_ON"
        } else {
            "SHELL_CMD_ECHO_OFF"
        };
        ctx.write_message(key, &[]);
        return Ok(());
    }

    let word = args.trim();
    if word.eq_ignore_ascii_case("OFF") {
        ctx.echo = false;
        return Ok(());
    }
    if word.eq_ignore_ascii_case("ON") {
        ctx.echo = true;
        return Ok(());
    }
    if word == "/?" {
        if let Some(def) = lookup("ECHO") {
            print_help(ctx, def);
        }
        return Ok(());
    }

    // the separator after ECHO (space, dot or slash) is not printed
    let mut chars = args.chars();
    chars.next();
    let line = format!("{}\n", chars.as_str());
    ctx.write(&line);
    Ok(())
}

/// `REM [comment]`
///
/// # Errors
///
/// Never.
pub const fn cmd_rem(_ctx: &mut ShellContext, _args: &str) -> Result<(), ShellError> {
    Ok(())
}

/// `PAUSE`
///
/// # Errors
///
/// Never.
pub fn cmd_pause(ctx: &mut ShellContext, _args: &str) -> Result<(), ShellError> {
    ctx.write_message("SHELL_CMD_PAUSE", &[]);
    if ctx.console.read_byte() == Some(0) {
        ctx.console.read_byte();
    }
    ctx.write("\n");
    Ok(())
}

/// Replace `%NAME%` with its value and `%%` with `%`. Undefined names
/// become empty and a `%` with no closing `%` is dropped.
#[must_use]
pub fn expand_variables(value: &str, env: &Environment) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
        } else if let Some(end) = after.find('%') {
            out.push_str(env.get(&after[..end]).unwrap_or(""));
            rest = &after[end + 1..];
        } else {
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

/// `SET [name[=value]]`
///
/// # Errors
///
/// * [`ShellError::NotSet`] when showing a variable that does not exist
pub fn cmd_set(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let args = args.trim();

    if args.is_empty() {
        let listing: String = ctx
            .env
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect();
        ctx.write(&listing);
        return Ok(());
    }

    let Some((name, value)) = args.split_once('=') else {
        let line = ctx
            .env
            .get(args)
            .map(|value| format!("{}={value}\n", args.to_ascii_uppercase()))
            .ok_or_else(|| ShellError::NotSet(args.to_string()))?;
        ctx.write(&line);
        return Ok(());
    };

    let value = expand_variables(value, &ctx.env);
    log::debug!("SET {name}={value}");
    ctx.env.set(name, &value);
    Ok(())
}

/// `TYPE file...`. Output stops at the first `0x1A` byte of each file.
///
/// # Errors
///
/// * [`ShellError::SyntaxError`] without a file name
/// * [`ShellError::FileNotFound`] for the first file that cannot be opened
pub fn cmd_type(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut rest = args.trim();
    if rest.is_empty() {
        return Err(ShellError::SyntaxError);
    }

    while !rest.trim().is_empty() {
        let (word, next) = strip_arg(rest);
        let input =
            InputStream::open(ctx, word).map_err(|_| ShellError::FileNotFound(word.to_string()))?;
        let result = type_contents(ctx, input);
        input.close(ctx)?;
        result?;
        ctx.write("\n");
        rest = next;
    }
    Ok(())
}

fn type_contents(ctx: &mut ShellContext, input: InputStream) -> Result<(), ShellError> {
    let mut buf = [0u8; 512];
    loop {
        let n = input.read(ctx, &mut buf)?;
        if n == 0 {
            return Ok(());
        }
        let chunk = &buf[..n];
        let end = chunk.iter().position(|&b| b == EOF_MARKER);
        let chunk = &chunk[..end.unwrap_or(n)];

        if input.is_console() {
            match chunk.first() {
                Some(&CTRL_C) => {
                    ctx.write("^C\n");
                    return Ok(());
                }
                Some(&ENTER) => ctx.write("\n"),
                _ => ctx.console.write_bytes(chunk),
            }
        } else {
            ctx.console.write_bytes(chunk);
        }

        if end.is_some() {
            return Ok(());
        }
    }
}

/// `CHOICE [/C[:]keys] [/N] [/S] [text]`. Sets the errorlevel to the
/// 1-based position of the key pressed.
///
/// # Errors
///
/// * [`ShellError::IllegalSwitch`] for a switch other than `/C`, `/N`,
///   `/S` and `/T`
/// * [`ShellError::Cancelled`] on Ctrl-C
pub fn cmd_choice(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut args = args.to_string();
    let hide_keys = scan_bool(&mut args, "N");
    let case_sensitive = scan_bool(&mut args, "S");
    scan_bool(&mut args, "T");

    let mut keys = "yn".to_string();
    if let Some(switch) = scan_remain(&args).map(str::to_string) {
        let body = &switch[1..];
        let Some(choices) = body.strip_prefix(['c', 'C']) else {
            return Err(ShellError::IllegalSwitch(switch));
        };
        let choices = choices.strip_prefix(':').unwrap_or(choices);
        if !choices.is_empty() {
            keys = choices.to_string();
        }
        if let Some(at) = args.find(&switch) {
            args.replace_range(at..at + switch.len(), "");
        }
    }
    if !case_sensitive {
        keys = keys.to_ascii_uppercase();
    }

    let text = args.trim();
    let text = if text.len() > 1 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    };

    let mut question = text.to_string();
    if !hide_keys {
        if !question.is_empty() {
            question.push(' ');
        }
        let list: Vec<String> = keys.chars().map(String::from).collect();
        question.push_str(&format!("[{}]?", list.join(",")));
    }
    ctx.write(&question);

    let index = read_choice(ctx.console.as_mut(), &keys, case_sensitive)?;
    ctx.errorlevel = u8::try_from(index + 1).unwrap_or(u8::MAX);
    log::debug!("CHOICE -> errorlevel {}", ctx.errorlevel);
    Ok(())
}

/// `HELP [/ALL]`
///
/// # Errors
///
/// Never.
pub fn cmd_help(ctx: &mut ShellContext, args: &str) -> Result<(), ShellError> {
    let mut args = args.to_string();
    let all = scan_bool(&mut args, "ALL");
    if !all {
        ctx.write_message("SHELL_CMD_HELP", &[]);
    }

    let mut written = 0;
    for def in COMMAND_REGISTRY.iter().filter(|def| all || !def.hidden) {
        let line = format!("<{:<8}> {}", def.name, ctx.messages.get(def.help));
        ctx.write(&line);
        written += 1;
        if written % HELP_PAGE_LINES == 0 {
            cmd_pause(ctx, "")?;
        }
    }
    Ok(())
}

/// `EXIT`
///
/// # Errors
///
/// Never.
pub const fn cmd_exit(ctx: &mut ShellContext, _args: &str) -> Result<(), ShellError> {
    ctx.exit_requested = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use dosshell_config::{MessageCatalog, PropertyStore};
    use dosshell_fs::HostFileSystem;
    use tempfile::TempDir;

    fn context(temp: &TempDir, input: &[u8]) -> (ShellContext, ScriptedConsole) {
        let mut fs = HostFileSystem::new();
        fs.mount('C', temp.path()).unwrap();
        let probe = ScriptedConsole::new(input);
        let ctx = ShellContext::new(
            Box::new(fs),
            Box::new(probe.clone()),
            MessageCatalog::default(),
            PropertyStore::default(),
        );
        (ctx, probe)
    }

    #[test]
    fn test_echo_states_and_text() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, probe) = context(&temp, b"");

        cmd_echo(&mut ctx, "").unwrap();
        cmd_echo(&mut ctx, " off ").unwrap();
        assert!(!ctx.echo);
        cmd_echo(&mut ctx, "").unwrap();
        cmd_echo(&mut ctx, " hello  world").unwrap();
        cmd_echo(&mut ctx, ".").unwrap();

        assert_eq!(
            probe.output(),
            "ECHO is on.\nECHO is off.\nhello  world\n\n"
        );
    }

    #[test]
    fn test_expand_variables() {
        let env: Environment = [("PATH", "C:\\BIN")].into_iter().collect();
        assert_eq!(expand_variables("%path%;D:\\", &env), "C:\\BIN;D:\\");
        assert_eq!(expand_variables("100%%", &env), "100%");
        assert_eq!(expand_variables("a%nope%b", &env), "ab");
        assert_eq!(expand_variables("50% off", &env), "50 off");
    }

    #[test]
    fn test_set_show_and_remove() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, probe) = context(&temp, b"");

        cmd_set(&mut ctx, " path=C:\\BIN").unwrap();
        cmd_set(&mut ctx, "PATH=%PATH%;D:\\").unwrap();
        cmd_set(&mut ctx, "path").unwrap();
        cmd_set(&mut ctx, "").unwrap();
        assert_eq!(
            probe.take_output(),
            "PATH=C:\\BIN;D:\\\nPATH=C:\\BIN;D:\\\n"
        );

        cmd_set(&mut ctx, "PATH=").unwrap();
        assert!(matches!(
            cmd_set(&mut ctx, "path"),
            Err(ShellError::NotSet(name)) if name == "path"
        ));
    }

    #[test]
    fn test_type_stops_at_eof_marker() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), b"first\x1asecret").unwrap();
        std::fs::write(temp.path().join("b.txt"), b"second").unwrap();
        let (mut ctx, probe) = context(&temp, b"");

        cmd_type(&mut ctx, "a.txt b.txt").unwrap();
        assert_eq!(probe.take_output(), "first\nsecond\n");

        assert!(matches!(
            cmd_type(&mut ctx, "missing.txt"),
            Err(ShellError::FileNotFound(name)) if name == "missing.txt"
        ));
        assert!(matches!(cmd_type(&mut ctx, "  "), Err(ShellError::SyntaxError)));
    }

    #[test]
    fn test_type_con_until_ctrl_c() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, probe) = context(&temp, &[b'h', b'i', ENTER, CTRL_C, b'x']);

        cmd_type(&mut ctx, "CON").unwrap();
        assert_eq!(probe.output(), "hi\n^C\n\n");
    }

    #[test]
    fn test_choice_sets_errorlevel() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, probe) = context(&temp, b"qn");

        cmd_choice(&mut ctx, "\"Continue\"").unwrap();
        assert_eq!(ctx.errorlevel, 2);
        assert_eq!(probe.take_output(), "Continue [Y,N]?N\n");

        probe.push_input(b"b");
        cmd_choice(&mut ctx, "/c:abc /n Pick").unwrap();
        assert_eq!(ctx.errorlevel, 2);
        assert_eq!(probe.take_output(), "PickB\n");

        assert!(matches!(
            cmd_choice(&mut ctx, "/x text"),
            Err(ShellError::IllegalSwitch(s)) if s == "/x"
        ));
    }

    #[test]
    fn test_help_lists_visible_commands() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, probe) = context(&temp, b"");

        cmd_help(&mut ctx, "").unwrap();
        let output = probe.take_output();
        assert!(output.contains("<DIR     > Displays a list"));
        assert!(!output.contains("<ERASE"));

        cmd_help(&mut ctx, "/all").unwrap();
        assert!(probe.output().contains("<ERASE   > Removes one or more files."));
    }

    #[test]
    fn test_exit_requests_exit() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, _probe) = context(&temp, b"");
        cmd_exit(&mut ctx, "").unwrap();
        assert!(ctx.exit_requested);
    }
}
