//! lox-resolve - the static pass between parsing and evaluation.
//!
//! The resolver never executes anything. It walks the statement list once,
//! tracking a stack of lexical scopes, and for every variable/`this`/`super`
//! reference records the number of scopes between the use site and its
//! declaration. The interpreter later uses that distance to read the
//! binding directly out of the right environment frame, which is what
//! gives Lox closures correct lexical semantics instead of a dynamic-scope
//! walk.

mod resolver;

pub mod edge_cases;

pub use resolver::Resolver;
