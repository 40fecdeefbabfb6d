//! Edge case tests for lox-scan
