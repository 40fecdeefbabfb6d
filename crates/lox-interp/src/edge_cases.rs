//! Edge case tests for lox-interp.
//!
//! These check error/no-error outcomes only: `println!` writes to the real
//! process stdout, which a same-process test can't capture, so it can't
//! assert *what* a scenario prints. Exact-stdout checks for the spec's
//! worked scenarios (closures, fibonacci, inheritance, etc.) live in
//! `lox-cli/tests/e2e_scenarios.rs`, which drives the compiled binary
//! through `assert_cmd` and can observe its real stdout.
