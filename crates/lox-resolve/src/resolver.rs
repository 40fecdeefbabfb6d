//! Scope-stack walker producing per-reference resolution depths.

use lox_parse::{ClassDecl, Expr, FunctionDecl, Stmt};
use lox_util::{ExprId, FxHashMap, Handler, Symbol};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Walks a statement list and produces, for every reference-bearing
/// expression, the number of scopes between it and its declaration.
pub struct Resolver<'a> {
    handler: &'a Handler,
    scopes: Vec<FxHashMap<Symbol, bool>>,
    locals: FxHashMap<ExprId, usize>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            scopes: Vec::new(),
            locals: FxHashMap::default(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves `statements`, returning the `ExprId -> depth` table the
    /// interpreter will use for every local variable, `this`, and `super`
    /// reference it evaluates.
    pub fn resolve(mut self, statements: &[Stmt]) -> FxHashMap<ExprId, usize> {
        let span = tracing::debug_span!("resolve").entered();
        self.resolve_statements(statements);
        tracing::debug!(locals = self.locals.len(), "resolve done");
        drop(span);
        self.locals
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, line: u32) {
        if let Some(scope) = self.scopes.last_mut() {
            let symbol = Symbol::intern(name);
            if scope.contains_key(&symbol) {
                self.handler.report_resolve(
                    line,
                    "Already a variable with this name in this scope.",
                );
            }
            scope.insert(symbol, false);
        }
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(Symbol::intern(name), true);
        }
    }

    /// Records the distance from the innermost scope to the scope that
    /// defines `name`, if any local scope defines it. An unresolved name is
    /// left out of `locals` entirely and treated as global at runtime.
    fn resolve_local(&mut self, id: ExprId, name: &str) {
        let symbol = Symbol::intern(name);
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&symbol) {
                self.locals.insert(id, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(&param.lexeme, param.line);
            self.define(&param.lexeme);
        }
        self.resolve_statements(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => self.resolve_expr(expr),
            Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(&name.lexeme, name.line);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(&name.lexeme);
            }
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name.lexeme, decl.name.line);
                self.define(&decl.name.lexeme);
                self.resolve_function(decl, FunctionType::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.handler
                        .report_resolve(keyword.line, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.handler.report_resolve(
                            keyword.line,
                            "Can't return a value from an initializer.",
                        );
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class(decl) => self.resolve_class(decl),
        }
    }

    fn resolve_class(&mut self, decl: &ClassDecl) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&decl.name.lexeme, decl.name.line);
        self.define(&decl.name.lexeme);

        if let Some(superclass) = &decl.superclass {
            if let Expr::Variable { name: super_name, .. } = superclass {
                if super_name.lexeme == decl.name.lexeme {
                    self.handler
                        .report_resolve(super_name.line, "A class can't inherit from itself.");
                }
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);
        }

        if decl.superclass.is_some() {
            self.begin_scope();
            self.scopes.last_mut().unwrap().insert(Symbol::intern("super"), true);
        }

        self.begin_scope();
        self.scopes.last_mut().unwrap().insert(Symbol::intern("this"), true);

        for method in &decl.methods {
            let kind = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if decl.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(inner) => self.resolve_expr(inner),
            Expr::Unary(_, right) => self.resolve_expr(right),
            Expr::Binary(left, _, right) => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Logical(left, _, right) => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&Symbol::intern(&name.lexeme)) == Some(&false) {
                        self.handler.report_resolve(
                            name.line,
                            "Can't read local variable in its own initializer.",
                        );
                    }
                }
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.handler
                        .report_resolve(keyword.line, "Can't use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(*id, "this");
            }
            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.handler
                            .report_resolve(keyword.line, "Can't use 'super' outside of a class.");
                    }
                    ClassType::Class => {
                        self.handler.report_resolve(
                            keyword.line,
                            "Can't use 'super' in a class with no superclass.",
                        );
                    }
                    ClassType::Subclass => {}
                }
                self.resolve_local(*id, "super");
            }
        }
    }
}
