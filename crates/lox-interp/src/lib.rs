//! lox-interp - the tree-walking evaluator.
//!
//! Ties `lox-resolve`'s scope-depth table to `lox-runtime`'s value model:
//! `Interpreter::run` resolves a statement list, then walks it directly,
//! producing side effects (`print`) and reporting at most one runtime error
//! through the shared `Handler`, matching the reference implementation's
//! halt-on-first-runtime-error behavior.

mod interpreter;

pub mod edge_cases;

pub use interpreter::Interpreter;
