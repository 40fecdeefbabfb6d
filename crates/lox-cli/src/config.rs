//! `.lox.toml` configuration.
//!
//! Entirely optional: every field has a default, so running the CLI with
//! no config file anywhere is the common case.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoxCliError, Result};

pub const CONFIG_FILE_NAME: &str = ".lox.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Enable verbose (debug-level) logging even without `--verbose`.
    #[serde(default)]
    pub verbose: bool,

    /// Prompt string shown by the REPL.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            prompt: default_prompt(),
        }
    }
}

impl Config {
    /// Looks for a config file in the current directory, then the user's
    /// home directory, falling back to defaults if neither has one.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoxCliError::ReadConfig(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| LoxCliError::ParseConfig(path.to_path_buf(), e))
    }

    fn find_config_file() -> Option<PathBuf> {
        let here = PathBuf::from(CONFIG_FILE_NAME);
        if here.exists() {
            return Some(here);
        }
        dirs::home_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}
