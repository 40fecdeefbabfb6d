//! Environment: a chain of name-to-value scopes.
//!
//! Frames are reference-counted rather than owned by a single enclosing
//! frame, because a closure must be able to outlive the block that created
//! its defining frame. Cyclic ownership between a class's methods and the
//! frame that binds the class's own name back to the class is an accepted
//! leak for a short-lived interpreter process (no tracing collector here).

use std::cell::RefCell;
use std::rc::Rc;

use lox_scan::Token;
use lox_util::{FxHashMap, Symbol};

use crate::error::{LoxRuntimeError, Result};
use crate::value::Value;

struct EnvironmentData {
    values: FxHashMap<Symbol, Value>,
    enclosing: Option<Environment>,
}

/// A single scope frame, cheap to clone (it's a reference-counted handle).
#[derive(Clone)]
pub struct Environment(Rc<RefCell<EnvironmentData>>);

impl Environment {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            values: FxHashMap::default(),
            enclosing: None,
        })))
    }

    pub fn with_enclosing(enclosing: Environment) -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            values: FxHashMap::default(),
            enclosing: Some(enclosing),
        })))
    }

    /// Unconditionally inserts into the current frame, permitting both
    /// shadowing and redefinition of an existing global.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().values.insert(Symbol::intern(name), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value> {
        let symbol = Symbol::intern(&name.lexeme);
        let data = self.0.borrow();
        if let Some(value) = data.values.get(&symbol) {
            return Ok(value.clone());
        }
        match &data.enclosing {
            Some(enclosing) => enclosing.get(name),
            None => Err(LoxRuntimeError::new(
                name.line,
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    pub fn assign(&self, name: &Token, value: Value) -> Result<()> {
        let symbol = Symbol::intern(&name.lexeme);
        let mut data = self.0.borrow_mut();
        if data.values.contains_key(&symbol) {
            data.values.insert(symbol, value);
            return Ok(());
        }
        match &data.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(LoxRuntimeError::new(
                name.line,
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// Follows `enclosing` exactly `n` times. Used only for resolver-guided
    /// access, where `n` is guaranteed in range.
    pub fn ancestor(&self, n: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..n {
            let next = env
                .0
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-recorded depth exceeds the live environment chain");
            env = next;
        }
        env
    }

    /// Reads a binding at a known distance without searching. Skips the
    /// "defined?" check the resolver already guarantees.
    pub fn get_at(&self, n: usize, name: &str) -> Value {
        let env = self.ancestor(n);
        let symbol = Symbol::intern(name);
        env.0
            .borrow()
            .values
            .get(&symbol)
            .cloned()
            .expect("resolver guarantees this binding exists at this depth")
    }

    pub fn assign_at(&self, n: usize, name: &Token, value: Value) {
        let env = self.ancestor(n);
        env.0
            .borrow_mut()
            .values
            .insert(Symbol::intern(&name.lexeme), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_scan::TokenKind;

    fn token(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, None, 1)
    }

    #[test]
    fn define_then_get_round_trips() {
        let env = Environment::new();
        env.define("a", Value::Number(1.0));
        assert_eq!(env.get(&token("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_walks_enclosing_chain() {
        let outer = Environment::new();
        outer.define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(outer);
        assert_eq!(inner.get(&token("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_missing_everywhere_is_a_runtime_error() {
        let env = Environment::new();
        let err = env.get(&token("missing")).unwrap_err();
        assert_eq!(err.message, "Undefined variable 'missing'.");
    }

    #[test]
    fn assign_updates_the_frame_that_owns_the_name() {
        let outer = Environment::new();
        outer.define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(outer.clone());
        inner.assign(&token("a"), Value::Number(2.0)).unwrap();
        assert_eq!(outer.get(&token("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn assign_to_undefined_name_is_an_error() {
        let env = Environment::new();
        assert!(env.assign(&token("x"), Value::Nil).is_err());
    }

    #[test]
    fn redefining_a_global_is_allowed() {
        let env = Environment::new();
        env.define("a", Value::Number(1.0));
        env.define("a", Value::Number(2.0));
        assert_eq!(env.get(&token("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn get_at_and_assign_at_use_exact_depth() {
        let global = Environment::new();
        global.define("a", Value::Number(0.0));
        let middle = Environment::with_enclosing(global.clone());
        let inner = Environment::with_enclosing(middle);
        assert_eq!(inner.get_at(1, "a"), Value::Number(0.0));
        inner.assign_at(1, &token("a"), Value::Number(9.0));
        assert_eq!(global.get(&token("a")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn closures_sharing_a_frame_observe_each_others_assignments() {
        let shared = Environment::new();
        shared.define("counter", Value::Number(0.0));
        let a = shared.clone();
        let b = shared.clone();
        a.assign(&token("counter"), Value::Number(1.0)).unwrap();
        assert_eq!(b.get(&token("counter")).unwrap(), Value::Number(1.0));
    }
}
