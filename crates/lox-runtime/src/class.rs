//! LoxClass: a class value, modeled apart from `Callable` so that
//! superclass validation and instantiation can pattern-match on
//! `Value::Class` directly instead of downcasting a trait object.

use std::rc::Rc;

use lox_util::{FxHashMap, Symbol};

use crate::error::Result;
use crate::function::LoxFunction;
use crate::instance::LoxInstance;
use crate::signal::Interpret;
use crate::value::Value;

#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    methods: FxHashMap<Symbol, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn new(
        name: String,
        superclass: Option<Rc<LoxClass>>,
        methods: FxHashMap<Symbol, Rc<LoxFunction>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name,
            superclass,
            methods,
        })
    }

    /// Walks the superclass chain; a subclass method shadows its parent's.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        let symbol = Symbol::intern(name);
        if let Some(method) = self.methods.get(&symbol) {
            return Some(method.clone());
        }
        self.superclass.as_ref()?.find_method(name)
    }

    /// A class with no `init` takes no arguments.
    pub fn arity(&self) -> usize {
        self.find_method("init")
            .map(|init| init.declaration.params.len())
            .unwrap_or(0)
    }

    pub fn instantiate(self: &Rc<Self>, interp: &mut dyn Interpret, args: Vec<Value>) -> Result<Value> {
        let instance = LoxInstance::new(self.clone());
        if let Some(init) = self.find_method("init") {
            init.bind(instance.clone()).call(interp, args)?;
        }
        Ok(Value::Instance(instance))
    }
}
