//! Runtime error type.
//!
//! Every failure the interpreter can raise while executing a resolved
//! program - type errors, arity mismatches, undefined names - carries the
//! line it happened on, so the driver can print the reference format
//! (`{message}\n[line N]`) without threading extra context back up.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct LoxRuntimeError {
    pub message: String,
    pub line: u32,
}

impl LoxRuntimeError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoxRuntimeError>;
