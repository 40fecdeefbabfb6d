//! CLI end-to-end tests.
//!
//! Runs the built `lox` binary against temp-file scripts and checks the
//! exit-code contract (0/65/70) and basic stdout/stderr behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lox_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lox"))
}

fn script(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_cli_help() {
    lox_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").or(predicate::str::contains("lox")));
}

#[test]
fn test_cli_version() {
    lox_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lox").or(predicate::str::contains("0.")));
}

#[test]
fn test_cli_runs_a_clean_script_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "hello.lox", "print \"hello\";");

    lox_bin()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn test_cli_syntax_error_exits_65() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "bad_syntax.lox", "print 1 +;");

    lox_bin().arg(&path).assert().code(65);
}

#[test]
fn test_cli_resolve_error_exits_65() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "bad_resolve.lox", "return 1;");

    lox_bin().arg(&path).assert().code(65);
}

#[test]
fn test_cli_runtime_error_exits_70() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "bad_runtime.lox", "print 1 + \"two\";");

    lox_bin()
        .arg(&path)
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Operands must be"));
}

#[test]
fn test_cli_missing_script_file_exits_74() {
    lox_bin().arg("/nonexistent/script.lox").assert().code(74);
}

#[test]
fn test_cli_verbose_flag_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "verbose.lox", "print 1;");

    lox_bin().arg(&path).arg("--verbose").assert().success();
}
