//! End-to-end scenarios, run against the compiled `lox` binary so stdout can
//! actually be captured and checked byte-for-byte (a same-process unit test
//! can't observe `println!` output; this is the only place that can).

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lox_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lox"))
}

fn run(source: &str) -> assert_cmd::assert::Assert {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.lox");
    std::fs::write(&path, source).unwrap();
    lox_bin().arg(&path).assert()
}

#[test]
fn test_scenario_arithmetic_precedence() {
    run("print 1 + 2 * 3;").success().stdout("7\n");
}

#[test]
fn test_scenario_variable_addition() {
    run("var a = 1; var b = 2; print a + b;").success().stdout("3\n");
}

#[test]
fn test_scenario_closures_resolve_against_declaration_scope() {
    let source = r#"
        var a = "global";
        {
          fun show() { print a; }
          show();
          var a = "local";
          show();
        }
    "#;
    run(source).success().stdout("global\nglobal\n");
}

#[test]
fn test_scenario_recursive_fibonacci() {
    let source = r#"
        fun fib(n) { if (n < 2) return n; return fib(n-1) + fib(n-2); }
        print fib(10);
    "#;
    run(source).success().stdout("55\n");
}

#[test]
fn test_scenario_method_call() {
    let source = r#"
        class Bacon { eat() { print "Crunch crunch crunch!"; } }
        Bacon().eat();
    "#;
    run(source).success().stdout("Crunch crunch crunch!\n");
}

#[test]
fn test_scenario_inheritance_and_super() {
    let source = r#"
        class A { method() { print "A"; } }
        class B < A { method() { super.method(); print "B"; } }
        B().method();
    "#;
    run(source).success().stdout("A\nB\n");
}

#[test]
fn test_scenario_adding_string_and_number_is_a_runtime_error() {
    run(r#"print "a" + 1;"#)
        .code(70)
        .stdout("")
        .stderr(predicate::str::contains("Operands must be two numbers or two strings."));
}

#[test]
fn test_scenario_undefined_variable_is_a_runtime_error() {
    run("print x;")
        .code(70)
        .stdout("")
        .stderr(predicate::str::contains("Undefined variable 'x'."));
}

#[test]
fn test_scenario_top_level_return_is_a_resolve_error() {
    run("return 1;").code(65).stdout("");
}

#[test]
fn test_scenario_class_inheriting_from_itself_is_a_resolve_error() {
    run("class Oops < Oops {}")
        .code(65)
        .stdout("")
        .stderr(predicate::str::contains("A class can't inherit from itself."));
}
