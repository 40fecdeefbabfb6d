//! LoxFunction: a user-defined function value, i.e. a closure.

use std::rc::Rc;

use lox_parse::FunctionDecl;

use crate::callable::Callable;
use crate::environment::Environment;
use crate::error::Result;
use crate::instance::LoxInstance;
use crate::signal::{Interpret, Signal};
use crate::value::Value;

pub struct LoxFunction {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Environment,
    pub is_initializer: bool,
}

impl std::fmt::Debug for LoxFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment, is_initializer: bool) -> Rc<Self> {
        Rc::new(Self {
            declaration,
            closure,
            is_initializer,
        })
    }

    /// Produces a copy of this function whose closure has one extra frame
    /// binding `this` to `instance` - what `Get` on an instance returns for
    /// a method, and what a class's `init` is bound to before being called.
    pub fn bind(&self, instance: LoxInstance) -> Rc<LoxFunction> {
        let env = Environment::with_enclosing(self.closure.clone());
        env.define("this", Value::Instance(instance));
        Rc::new(LoxFunction {
            declaration: self.declaration.clone(),
            closure: env,
            is_initializer: self.is_initializer,
        })
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interp: &mut dyn Interpret, args: Vec<Value>) -> Result<Value> {
        let env = Environment::with_enclosing(self.closure.clone());
        for (param, arg) in self.declaration.params.iter().zip(args) {
            env.define(&param.lexeme, arg);
        }

        let signal = interp.execute_block(&self.declaration.body, env)?;

        // An initializer always yields the instance it was bound to,
        // regardless of any internal `return;`.
        if self.is_initializer {
            return Ok(self.closure.get_at(0, "this"));
        }

        Ok(match signal {
            Signal::Return(value) => value,
            Signal::Normal => Value::Nil,
        })
    }

    fn describe(&self) -> String {
        format!("<fn {}>", self.declaration.name.lexeme)
    }
}
