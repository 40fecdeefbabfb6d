//! Edge case tests for lox-resolve
