//! End-to-end behaviour of the shell over a real host directory.

use std::collections::BTreeMap;
use std::fs;

use dosshell_commands::{CTRL_C, ScriptedConsole, Shell, ShellError};
use dosshell_config::{MessageCatalog, ShellConfig};
use tempfile::TempDir;

fn shell_with(files: &[(&str, &str)], input: &[u8]) -> (TempDir, Shell, ScriptedConsole) {
    let temp = TempDir::new().unwrap();
    for (name, contents) in files {
        let path = temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    let probe = ScriptedConsole::new(input);
    let shell = Shell::from_config(
        &ShellConfig::default(),
        &[('C', temp.path().to_path_buf())],
        Box::new(probe.clone()),
    )
    .unwrap();
    (temp, shell, probe)
}

#[test]
fn test_rename_replaces_extension_keeps_name() {
    let (temp, mut shell, probe) = shell_with(&[("a.txt", "a"), ("report.doc", "r")], b"");
    shell.execute("ren *.* *.bak");

    assert!(temp.path().join("a.bak").exists());
    assert!(temp.path().join("report.bak").exists());
    assert!(!temp.path().join("a.txt").exists());
    assert!(!temp.path().join("report.doc").exists());
    assert_eq!(probe.output(), "");
}

#[test]
fn test_rename_question_mark_copies_position() {
    let (temp, mut shell, _probe) = shell_with(&[("test.txt", "t")], b"");
    shell.execute("rename ?est.txt best.*");
    assert!(temp.path().join("best.txt").exists());
    assert!(!temp.path().join("test.txt").exists());
}

#[test]
fn test_dir_group_name_order() {
    let (temp, mut shell, probe) = shell_with(&[("a.txt", "a")], b"");
    fs::create_dir(temp.path().join("B")).unwrap();
    fs::create_dir(temp.path().join("A")).unwrap();

    shell.execute("dir /b /o");
    assert_eq!(probe.take_output(), "A\nB\na.txt\n");

    shell.execute("dir /b /on");
    assert_eq!(probe.take_output(), "A\na.txt\nB\n");
}

#[test]
fn test_if_not_exist_goto() {
    let script = "@echo off\r\nif not exist missing.txt goto skip\r\necho present\r\n:skip\r\necho end\r\n";
    let (temp, mut shell, probe) = shell_with(&[("check.bat", script)], b"");

    shell.run_batch("check.bat", &[]).unwrap();
    assert_eq!(probe.take_output(), "end\n");

    fs::write(temp.path().join("missing.txt"), "here").unwrap();
    shell.run_batch("check.bat", &[]).unwrap();
    assert_eq!(probe.take_output(), "present\nend\n");
}

#[test]
fn test_if_errorlevel_is_at_least() {
    let (_temp, mut shell, probe) = shell_with(&[], b"");
    for (level, expected) in [(0, ""), (1, ""), (2, "yes\n"), (3, "yes\n")] {
        shell.context_mut().errorlevel = level;
        shell.execute("if errorlevel 2 echo yes");
        assert_eq!(probe.take_output(), expected, "errorlevel {level}");
    }
}

#[test]
fn test_cancelled_delete_keeps_remaining_files() {
    let (temp, mut shell, probe) = shell_with(
        &[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")],
        &[b'y', CTRL_C],
    );
    shell.execute("del /p *.txt");

    assert!(!temp.path().join("a.txt").exists());
    assert!(temp.path().join("b.txt").exists());
    assert!(temp.path().join("c.txt").exists());
    assert!(probe.output().ends_with("^C\n"));
}

#[test]
fn test_concatenation_counts_as_one_file() {
    let (temp, mut shell, probe) =
        shell_with(&[("a.txt", "one "), ("b.txt", "two "), ("c.txt", "three")], b"");
    shell.execute("copy a.txt+b.txt+c.txt");

    assert_eq!(
        fs::read_to_string(temp.path().join("a.txt")).unwrap(),
        "one two three"
    );
    assert!(probe.output().ends_with("   1 file(s) copied.\n"));
}

#[test]
fn test_copy_onto_itself_is_rejected() {
    let (temp, mut shell, probe) = shell_with(&[("a.txt", "keep")], b"");
    shell.execute("copy a.txt a.txt");

    let messages = MessageCatalog::new(BTreeMap::new());
    assert!(probe.output().contains(&ShellError::SelfCopy.render(&messages)));
    assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "keep");
}

#[test]
fn test_errors_are_reported_once_and_shell_continues() {
    let (_temp, mut shell, probe) = shell_with(&[("a.txt", "a")], b"");
    let messages = MessageCatalog::new(BTreeMap::new());

    shell.execute("dir /x");
    assert_eq!(
        probe.take_output(),
        ShellError::IllegalSwitch("/x".to_string()).render(&messages)
    );

    shell.execute("frobnicate");
    assert_eq!(
        probe.take_output(),
        ShellError::IllegalCommand("frobnicate".to_string()).render(&messages)
    );

    shell.execute("dir /b");
    assert_eq!(probe.take_output(), "a.txt\n");
}

#[test]
fn test_enumeration_survives_nested_command() {
    let script = "@echo off\r\nif exist *.txt dir /b *.doc\r\ndir /b *.txt\r\n";
    let (_temp, mut shell, probe) = shell_with(
        &[("a.txt", "a"), ("b.txt", "b"), ("x.doc", "x"), ("run.bat", script)],
        b"",
    );
    shell.run_batch("run.bat", &[]).unwrap();
    assert_eq!(probe.output(), "x.doc\na.txt\nb.txt\n");
}

#[test]
fn test_missing_goto_label_continues() {
    let script = "@echo off\r\ngoto nowhere\r\necho after\r\n";
    let (_temp, mut shell, console) = shell_with(&[("jump.bat", script)], b"");
    shell.run_batch("jump.bat", &[]).unwrap();

    let messages = MessageCatalog::new(BTreeMap::new());
    let label_error = ShellError::LabelNotFound("nowhere".to_string()).render(&messages);
    assert_eq!(console.output(), format!("{label_error}after\n"));
}

#[test]
fn test_if_exist_on_unknown_drive_runs_nothing() {
    let (_temp, mut shell, console) = shell_with(&[], b"");
    let messages = MessageCatalog::new(BTreeMap::new());

    for line in ["if exist Q:\\x.txt echo ran", "if not exist Q:\\x.txt echo ran"] {
        shell.execute(line);
        assert_eq!(
            console.take_output(),
            ShellError::IllegalPath.render(&messages),
            "{line}"
        );
    }
}

#[test]
fn test_if_without_command_does_nothing() {
    let (_temp, mut shell, console) = shell_with(&[], b"");
    for line in ["if a==a", "if not a==b", "if errorlevel 0"] {
        shell.execute(line);
        assert_eq!(console.take_output(), "", "{line}");
    }
}
