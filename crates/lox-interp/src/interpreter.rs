//! The tree-walking evaluator: statements and expressions, executed
//! directly against the resolved AST.

use std::rc::Rc;

use lox_parse::{ClassDecl, Expr, LiteralValue, Stmt};
use lox_resolve::Resolver;
use lox_runtime::{
    clock, Callable, Environment, Interpret, LoxClass, LoxFunction, LoxRuntimeError, Result, Signal, Value,
};
use lox_scan::{Token, TokenKind};
use lox_util::{ExprId, FxHashMap, Handler, Symbol};

/// Restores the interpreter's active environment when a block finishes,
/// whether it finished by running out of statements, by a `Signal::Return`,
/// or by propagating a runtime error.
struct EnvironmentGuard<'i, 'a> {
    interp: &'i mut Interpreter<'a>,
    previous: Environment,
}

impl<'i, 'a> Drop for EnvironmentGuard<'i, 'a> {
    fn drop(&mut self) {
        self.interp.environment = self.previous.clone();
    }
}

pub struct Interpreter<'a> {
    handler: &'a Handler,
    globals: Environment,
    environment: Environment,
    locals: FxHashMap<ExprId, usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        let globals = Environment::new();
        globals.define("clock", Value::Callable(clock()));
        Self {
            handler,
            environment: globals.clone(),
            globals,
            locals: FxHashMap::default(),
        }
    }

    /// Resolves `statements` and executes them, reporting the first runtime
    /// error it hits (if any) and stopping there, matching the reference
    /// implementation's single-error-then-halt behavior.
    pub fn run(&mut self, statements: &[Stmt]) {
        let span = tracing::debug_span!("interpret").entered();
        self.locals = Resolver::new(self.handler).resolve(statements);
        if self.handler.had_resolve_error() {
            return;
        }
        for (index, stmt) in statements.iter().enumerate() {
            tracing::trace!(index, "executing top-level statement");
            match self.execute(stmt) {
                Ok(_) => {}
                Err(err) => {
                    self.handler.report_runtime(err.line, err.message);
                    return;
                }
            }
        }
        drop(span);
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Signal::Normal)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", value.stringify());
                Ok(Signal::Normal)
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(&name.lexeme, value);
                Ok(Signal::Normal)
            }
            Stmt::Block(statements) => {
                let env = Environment::with_enclosing(self.environment.clone());
                self.execute_block(statements, env)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Signal::Normal)
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Signal::Normal => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::Function(decl) => {
                let function = LoxFunction::new(decl.clone(), self.environment.clone(), false);
                self.environment.define(&decl.name.lexeme, Value::Callable(function));
                Ok(Signal::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(value))
            }
            Stmt::Class(decl) => self.execute_class(decl),
        }
    }

    fn execute_class(&mut self, decl: &Rc<ClassDecl>) -> Result<Signal> {
        let superclass = match &decl.superclass {
            Some(Expr::Variable { id, name }) => match self.look_up_variable(Some(*id), name)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(LoxRuntimeError::new(name.line, "Superclass must be a class."));
                }
            },
            Some(_) => unreachable!("the parser only ever builds a superclass as a Variable"),
            None => None,
        };

        self.environment.define(&decl.name.lexeme, Value::Nil);

        let method_closure = match &superclass {
            Some(superclass) => {
                let env = Environment::with_enclosing(self.environment.clone());
                env.define("super", Value::Class(superclass.clone()));
                env
            }
            None => self.environment.clone(),
        };

        let mut methods = FxHashMap::default();
        for method in &decl.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(method.clone(), method_closure.clone(), is_initializer);
            methods.insert(Symbol::intern(&method.name.lexeme), function);
        }

        let class = LoxClass::new(decl.name.lexeme.clone(), superclass, methods);
        self.environment.assign(&decl.name, Value::Class(class))?;
        Ok(Signal::Normal)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary(operator, right) => self.evaluate_unary(operator, right),
            Expr::Binary(left, operator, right) => self.evaluate_binary(left, operator, right),
            Expr::Logical(left, operator, right) => self.evaluate_logical(left, operator, right),
            Expr::Variable { id, name } => self.look_up_variable(Some(*id), name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&depth) => self.environment.assign_at(depth, name, value.clone()),
                    None => self.globals.assign(name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Call { callee, paren, args } => self.evaluate_call(callee, paren, args),
            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(LoxRuntimeError::new(name.line, "Only instances have properties.")),
            },
            Expr::Set { object, name, value } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value = self.evaluate(value)?;
                    instance.set(name, value.clone());
                    Ok(value)
                }
                _ => Err(LoxRuntimeError::new(name.line, "Only instances have fields.")),
            },
            Expr::This { id, keyword } => self.look_up_variable(Some(*id), keyword),
            Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&mut self, id: Option<ExprId>, name: &Token) -> Result<Value> {
        match id.and_then(|id| self.locals.get(&id)) {
            Some(&depth) => Ok(self.environment.get_at(depth, &name.lexeme)),
            None => self.globals.get(name),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right = self.evaluate(right)?;
        match operator.kind {
            TokenKind::Minus => Ok(Value::Number(-unary_number_operand(operator, &right)?)),
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("the parser never emits any other unary operator"),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        match operator.kind {
            TokenKind::Minus => Ok(Value::Number(
                binary_number_operand(operator, &left)? - binary_number_operand(operator, &right)?,
            )),
            TokenKind::Slash => Ok(Value::Number(
                binary_number_operand(operator, &left)? / binary_number_operand(operator, &right)?,
            )),
            TokenKind::Star => Ok(Value::Number(
                binary_number_operand(operator, &left)? * binary_number_operand(operator, &right)?,
            )),
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
                _ => Err(LoxRuntimeError::new(
                    operator.line,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::Greater => Ok(Value::Bool(
                binary_number_operand(operator, &left)? > binary_number_operand(operator, &right)?,
            )),
            TokenKind::GreaterEqual => Ok(Value::Bool(
                binary_number_operand(operator, &left)? >= binary_number_operand(operator, &right)?,
            )),
            TokenKind::Less => Ok(Value::Bool(
                binary_number_operand(operator, &left)? < binary_number_operand(operator, &right)?,
            )),
            TokenKind::LessEqual => Ok(Value::Bool(
                binary_number_operand(operator, &left)? <= binary_number_operand(operator, &right)?,
            )),
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            _ => unreachable!("the parser never emits any other binary operator"),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        match operator.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, args: &[Expr]) -> Result<Value> {
        let callee = self.evaluate(callee)?;
        let mut arguments = Vec::with_capacity(args.len());
        for arg in args {
            arguments.push(self.evaluate(arg)?);
        }

        match callee {
            Value::Callable(callable) => {
                check_arity(paren, callable.arity(), arguments.len())?;
                callable.call(self, arguments)
            }
            Value::Class(class) => {
                check_arity(paren, class.arity(), arguments.len())?;
                class.instantiate(self, arguments)
            }
            _ => Err(LoxRuntimeError::new(paren.line, "Can only call functions and classes.")),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let depth = *self
            .locals
            .get(&id)
            .expect("the resolver always records a depth for a valid 'super' reference");
        let superclass = match self.environment.get_at(depth, "super") {
            Value::Class(class) => class,
            _ => unreachable!("the resolver only ever binds 'super' to a class"),
        };
        let instance = match self.environment.get_at(depth - 1, "this") {
            Value::Instance(instance) => instance,
            _ => unreachable!("'this' sits exactly one frame closer than 'super'"),
        };
        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Callable(found.bind(instance))),
            None => Err(LoxRuntimeError::new(
                keyword.line,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }
}

impl<'a> Interpret for Interpreter<'a> {
    fn execute_block(&mut self, statements: &[Stmt], environment: Environment) -> Result<Signal> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let mut guard = EnvironmentGuard { interp: self, previous };

        for stmt in statements {
            match guard.interp.execute(stmt)? {
                Signal::Normal => {}
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Nil => Value::Nil,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Num(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::string(s.clone()),
    }
}

fn unary_number_operand(operator: &Token, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(LoxRuntimeError::new(operator.line, "Operand must be a number.")),
    }
}

fn binary_number_operand(operator: &Token, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(LoxRuntimeError::new(operator.line, "Operands must be numbers.")),
    }
}

fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(LoxRuntimeError::new(
            paren.line,
            format!("Expected {expected} arguments but got {got}."),
        ));
    }
    Ok(())
}
