//! `lox` - a tree-walking Lox interpreter.
//!
//! Run a script file (`lox script.lox`), or omit the argument to start an
//! interactive REPL. Exit codes follow the reference implementation:
//! `0` on success, `65` on a syntax or static-resolution error, `70` on an
//! unhandled runtime error, `74` if the script or config file can't be read.

mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lox_interp::Interpreter;
use lox_parse::Parser as LoxParser;
use lox_scan::Scanner;
use lox_util::Handler;

use config::Config;
use error::{LoxCliError, Result};

const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;
const EX_IOERR: i32 = 74;

/// Lox - a tree-walking interpreter
#[derive(Parser, Debug)]
#[command(name = "lox")]
#[command(author = "Lox Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tree-walking interpreter for Lox", long_about = None)]
struct Cli {
    /// Script to run. Omitted: start an interactive REPL.
    script: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "LOX_VERBOSE")]
    verbose: bool,

    /// Path to a `.lox.toml` configuration file.
    #[arg(short, long, global = true, env = "LOX_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored log output.
    #[arg(long, global = true, env = "LOX_NO_COLOR")]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.script.is_some() && std::env::args().len() > 3 {
        eprintln!("Usage: lox [script]");
        std::process::exit(EX_USAGE);
    }

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("error: {e}");
        std::process::exit(EX_SOFTWARE);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(EX_IOERR);
        }
    };

    let exit_code = match &cli.script {
        Some(path) => run_file(path),
        None => run_prompt(&config),
    };
    std::process::exit(exit_code);
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| LoxCliError::Logging(e.to_string()))?;

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn run_file(path: &Path) -> i32 {
    tracing::info!(path = %path.display(), "running script");
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", LoxCliError::ReadScript(path.to_path_buf(), e));
            return EX_IOERR;
        }
    };
    let code = run_source(&source);
    tracing::debug!(exit_code = code, "script finished");
    code
}

/// Runs one complete program and maps the `Handler`'s final state to an
/// exit code: a syntax or resolve error means the program never ran at all
/// (65); a runtime error means it ran partway before aborting (70).
fn run_source(source: &str) -> i32 {
    let handler = Handler::new();
    let tokens = Scanner::new(source, &handler).scan();
    let statements = LoxParser::new(tokens, &handler).parse();

    if handler.had_syntax_error() {
        return EX_DATAERR;
    }

    let mut interpreter = Interpreter::new(&handler);
    interpreter.run(&statements);

    if handler.had_resolve_error() {
        return EX_DATAERR;
    }
    if handler.had_runtime_error() {
        return EX_SOFTWARE;
    }
    0
}

/// Reads one line at a time, sharing a single `Interpreter` (and so a
/// single global environment) across the whole session, but clearing the
/// syntax/resolve flags between lines so one bad line doesn't shut the
/// REPL down.
fn run_prompt(config: &Config) -> i32 {
    tracing::info!("starting REPL");
    let handler = Handler::new();
    let mut interpreter = Interpreter::new(&handler);
    let stdin = io::stdin();

    loop {
        print!("{}", config.prompt);
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let tokens = Scanner::new(&line, &handler).scan();
        let statements = LoxParser::new(tokens, &handler).parse();
        if !handler.had_syntax_error() {
            interpreter.run(&statements);
        }

        handler.reset_syntax();
        handler.reset_resolve();
    }

    if handler.had_runtime_error() {
        EX_SOFTWARE
    } else {
        0
    }
}
