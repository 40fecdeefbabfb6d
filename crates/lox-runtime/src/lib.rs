//! lox-runtime - the value model and execution environment shared by the
//! interpreter and its callables.
//!
//! This crate owns `Value`, `Environment`, `Callable`, and the concrete
//! callable kinds (`LoxFunction`, `LoxClass`, `LoxInstance`, native
//! functions), but not statement/expression evaluation itself - that lives
//! one layer up in `lox-interp`, reached back into through the `Interpret`
//! trait so this crate never depends on it.

mod callable;
mod class;
mod environment;
mod error;
mod function;
mod instance;
mod signal;
mod value;

pub mod edge_cases;

pub use callable::{clock, Callable, NativeFunction};
pub use class::LoxClass;
pub use environment::Environment;
pub use error::{LoxRuntimeError, Result};
pub use function::LoxFunction;
pub use instance::LoxInstance;
pub use signal::{Interpret, Signal};
pub use value::Value;
