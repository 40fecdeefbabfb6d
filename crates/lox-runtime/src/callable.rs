//! The `Callable` trait: anything `(...)` can be applied to.
//!
//! Implemented by native functions (`clock`) and user functions/closures.
//! Classes are callable too (construction), but are modeled as their own
//! `Value::Class` variant rather than through this trait, since
//! instantiation needs to return an instance whose `LoxClass` is known
//! statically rather than through a trait object.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::signal::Interpret;
use crate::value::Value;

pub trait Callable: fmt::Debug {
    fn arity(&self) -> usize;
    fn call(&self, interp: &mut dyn Interpret, args: Vec<Value>) -> Result<Value>;
    /// The string `Value::stringify` prints for this callable.
    fn describe(&self) -> String;
}

type NativeFn = fn(&[Value]) -> Value;

/// A native (host-implemented) function, e.g. `clock`.
pub struct NativeFunction {
    name: &'static str,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: &'static str, arity: usize, func: NativeFn) -> Rc<Self> {
        Rc::new(Self { name, arity, func })
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, _interp: &mut dyn Interpret, args: Vec<Value>) -> Result<Value> {
        Ok((self.func)(&args))
    }

    fn describe(&self) -> String {
        "<native fn>".to_string()
    }
}

/// `clock` - seconds since the Unix epoch. Arity 0.
pub fn clock() -> Rc<NativeFunction> {
    NativeFunction::new("clock", 0, |_args| {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Value::Number(now.as_secs_f64())
    })
}
