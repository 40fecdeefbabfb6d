//! Error handling for the `lox` CLI itself.
//!
//! Everything the interpreter pipeline can raise (syntax/resolve/runtime
//! errors) is reported through `lox_util::Handler`, not this type. This
//! error type is only for failures around that pipeline: a script that
//! can't be read, or a malformed config file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoxCliError {
    #[error("couldn't read script {0}: {1}")]
    ReadScript(PathBuf, #[source] std::io::Error),

    #[error("couldn't read config {0}: {1}")]
    ReadConfig(PathBuf, #[source] std::io::Error),

    #[error("couldn't parse config {0}: {1}")]
    ParseConfig(PathBuf, #[source] toml::de::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, LoxCliError>;
