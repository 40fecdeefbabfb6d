//! Diagnostic collection and reporting.
//!
//! Lox's three phases that can fail before producing a value - scanning,
//! parsing, and resolving - never return a `Result`. Instead they call back
//! into a shared `Handler`, print immediately, and keep going so a single
//! run can surface every error in the source rather than stopping at the
//! first one. Runtime errors are the one phase that *does* unwind (a
//! `LoxRuntimeError` propagated with `?` out of `lox-interp`), but they are
//! still funneled through this same `Handler` at the top level so the CLI
//! has one place to ask "did anything go wrong, and what exit code should
//! that be".

use std::cell::{Cell, RefCell};

/// Which phase raised a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    Resolve,
    Runtime,
}

/// One reported error, already formatted the way it will be printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: u32,
    /// Extra context inserted between "Error" and the message, e.g.
    /// `" at 'foo'"`. Empty for diagnostics with no token context.
    pub location: String,
    pub message: String,
}

impl Diagnostic {
    /// Render in the reference implementation's exact format:
    /// `[line N] Error{location}: {message}` for syntax/resolve errors, or
    /// `{message}\n[line N]` for runtime errors.
    pub fn format(&self) -> String {
        match self.kind {
            DiagnosticKind::Syntax | DiagnosticKind::Resolve => format!(
                "[line {}] Error{}: {}",
                self.line, self.location, self.message
            ),
            DiagnosticKind::Runtime => format!("{}\n[line {}]", self.message, self.line),
        }
    }
}

/// Collects diagnostics and tracks whether the run has failed.
///
/// Every `report_*` call both records the diagnostic and prints it to
/// stderr immediately, matching the reference interpreter's habit of
/// reporting errors as it finds them rather than batching them.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    had_syntax_error: Cell<bool>,
    had_resolve_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, diagnostic: Diagnostic) {
        eprintln!("{}", diagnostic.format());
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn report_syntax(&self, line: u32, location: impl Into<String>, message: impl Into<String>) {
        self.had_syntax_error.set(true);
        self.record(Diagnostic {
            kind: DiagnosticKind::Syntax,
            line,
            location: location.into(),
            message: message.into(),
        });
    }

    pub fn report_resolve(&self, line: u32, message: impl Into<String>) {
        self.had_resolve_error.set(true);
        self.record(Diagnostic {
            kind: DiagnosticKind::Resolve,
            line,
            location: String::new(),
            message: message.into(),
        });
    }

    pub fn report_runtime(&self, line: u32, message: impl Into<String>) {
        self.had_runtime_error.set(true);
        self.record(Diagnostic {
            kind: DiagnosticKind::Runtime,
            line,
            location: String::new(),
            message: message.into(),
        });
    }

    pub fn had_syntax_error(&self) -> bool {
        self.had_syntax_error.get()
    }

    pub fn had_resolve_error(&self) -> bool {
        self.had_resolve_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Clear the syntax-error flag between REPL lines, so one bad line
    /// doesn't poison the rest of the session.
    pub fn reset_syntax(&self) {
        self.had_syntax_error.set(false);
    }

    /// Clear the resolve-error flag between REPL lines. `Interpreter::run`
    /// refuses to execute a line whose resolution failed, so without this a
    /// single bad reference would permanently stop the REPL from running
    /// anything else on the same handler.
    pub fn reset_resolve(&self) {
        self.had_resolve_error.set(false);
    }

    pub fn diagnostics(&self) -> std::cell::Ref<'_, Vec<Diagnostic>> {
        self.diagnostics.borrow()
    }
}
