use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn tungsten() -> Command {
    let mut cmd = Command::cargo_bin("tungsten").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_no_input_files() {
    let dir = tempfile::tempdir().unwrap();
    tungsten()
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("tungsten: error: no input files"));
}

#[test]
fn test_valid_file_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "ok.tg", "fn main() {\n    let x = 1 + 2;\n}\n");
    tungsten()
        .current_dir(dir.path())
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere.tg");
    tungsten()
        .current_dir(dir.path())
        .arg(&missing)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "tungsten: error: no such file: '{}'",
            missing.display()
        )))
        .stderr(predicate::str::contains("tungsten: error: no input files"));
}

#[test]
fn test_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    tungsten()
        .current_dir(dir.path())
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "'{}' is a directory",
            dir.path().display()
        )));
}

#[test]
fn test_syntax_error_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "bad.tg", "fn main() {\n    let c = ;\n}\n");
    tungsten()
        .current_dir(dir.path())
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "tungsten: error: {}:2:13: expected expression, found `;`",
            file.display()
        )));
}

#[test]
fn test_deny_errors_sets_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "bad.tg", "let = 1;\n");
    tungsten()
        .current_dir(dir.path())
        .arg("--deny-errors")
        .arg(&file)
        .assert()
        .code(1);
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "tungsten.toml", "[diagnostics]\ndeny_errors = true\n");
    let file = write(&dir, "bad.tg", "let = 1;\n");
    tungsten()
        .current_dir(dir.path())
        .arg(&file)
        .assert()
        .code(1);
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "broken.toml", "[lexer]\ntab_width = 0\n");
    let file = write(&dir, "ok.tg", "let x = 1;\n");
    tungsten()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("lexer.tab_width"));
}

#[test]
fn test_flag_overrides_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "ok.tg", "let x = 1;\n");
    tungsten()
        .current_dir(dir.path())
        .args(["--max-depth", "0"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parser.max_depth"));

    tungsten()
        .current_dir(dir.path())
        .args(["--max-depth", "10000000"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parser.max_depth"));
}

#[test]
fn test_long_expression_chain_does_not_crash() {
    let dir = tempfile::tempdir().unwrap();
    let source = format!("let x = 1{};\n", "+1".repeat(500_000));
    let file = write(&dir, "long.tg", &source);
    tungsten()
        .current_dir(dir.path())
        .arg("--emit-ast")
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("nesting limit of 128 exceeded"));
}

#[test]
fn test_emit_ast() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "tree.tg", "fn main() {}\n");
    tungsten()
        .current_dir(dir.path())
        .arg("--emit-ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Program"))
        .stdout(predicate::str::contains("\"main\""));
}

#[test]
fn test_rich_format() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "bad.tg", "let c = ;\n");
    tungsten()
        .current_dir(dir.path())
        .args(["--format", "rich"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("tungsten::parse::expected"));
}
