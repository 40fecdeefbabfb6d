//! LoxInstance: a live object, one per `class.instantiate()` call.

use std::cell::RefCell;
use std::rc::Rc;

use lox_scan::Token;
use lox_util::{FxHashMap, Symbol};

use crate::class::LoxClass;
use crate::error::{LoxRuntimeError, Result};
use crate::value::Value;

struct LoxInstanceData {
    class: Rc<LoxClass>,
    fields: FxHashMap<Symbol, Value>,
}

/// Cheap to clone - a reference-counted handle, so every `Value::Instance`
/// referring to the same object shares its field table.
#[derive(Clone)]
pub struct LoxInstance(Rc<RefCell<LoxInstanceData>>);

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self(Rc::new(RefCell::new(LoxInstanceData {
            class,
            fields: FxHashMap::default(),
        })))
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().class.name.clone()
    }

    pub fn is_same(&self, other: &LoxInstance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Fields shadow methods: a field named the same as a method hides it.
    pub fn get(&self, name: &Token) -> Result<Value> {
        let symbol = Symbol::intern(&name.lexeme);
        let data = self.0.borrow();
        if let Some(value) = data.fields.get(&symbol) {
            return Ok(value.clone());
        }
        if let Some(method) = data.class.find_method(&name.lexeme) {
            let bound = method.bind(self.clone());
            return Ok(Value::Callable(bound));
        }
        Err(LoxRuntimeError::new(
            name.line,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    pub fn set(&self, name: &Token, value: Value) {
        self.0
            .borrow_mut()
            .fields
            .insert(Symbol::intern(&name.lexeme), value);
    }
}
