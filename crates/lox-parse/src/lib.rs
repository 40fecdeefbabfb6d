//! lox-parse - recursive-descent parser and AST for Lox.
//!
//! Consumes the token stream `lox-scan` produces and builds a statement
//! list. Parse errors enter panic-mode recovery (discard to the next
//! statement boundary) rather than aborting, so a single run can report
//! every syntax error in a file.

mod ast;
mod parser;

pub mod edge_cases;

pub use ast::{ClassDecl, Expr, FunctionDecl, LiteralValue, Stmt};
pub use parser::Parser;
