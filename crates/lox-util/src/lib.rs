//! lox-util - shared foundation types for the Lox pipeline.
//!
//! Every other crate in the workspace (`lox-scan`, `lox-parse`,
//! `lox-resolve`, `lox-runtime`, `lox-interp`, `lox-cli`) depends on this
//! one for the handful of cross-cutting concerns that don't belong to any
//! single pipeline phase: identifier interning, diagnostic collection (by
//! plain `u32` source line), and AST node identity.

mod diagnostic;
mod node_id;
mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticKind, Handler};
pub use node_id::{ExprId, ExprIdGen};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
