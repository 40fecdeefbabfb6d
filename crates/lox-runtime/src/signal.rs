//! Non-local return, threaded through statement execution instead of an
//! exception-style unwind.
//!
//! Each statement (and the block/loop/call frames that contain it) returns
//! a `Signal` rather than `()`: `Normal` means "keep going", `Return`
//! carries a value out through every enclosing block and loop until it
//! reaches the call frame that started the function.

use lox_parse::Stmt;

use crate::environment::Environment;
use crate::error::Result;
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum Signal {
    Normal,
    Return(Value),
}

/// The callback surface `lox-runtime`'s callable values need back into the
/// statement/expression evaluator, which lives one layer up in
/// `lox-interp`. Keeping this as a trait (rather than `lox-runtime`
/// depending on `lox-interp`) avoids a dependency cycle: `LoxFunction::call`
/// only needs to ask "run this body in this environment", not anything
/// about how expressions are evaluated.
pub trait Interpret {
    fn execute_block(&mut self, statements: &[Stmt], environment: Environment) -> Result<Signal>;
}
