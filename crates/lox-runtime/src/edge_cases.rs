//! Edge case tests for lox-runtime
