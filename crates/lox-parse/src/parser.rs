//! Recursive-descent parser: tokens to statement list.

use std::rc::Rc;

use lox_scan::{Literal as TokenLiteral, Token, TokenKind};
use lox_util::{ExprIdGen, Handler};

use crate::ast::{ClassDecl, Expr, FunctionDecl, LiteralValue, Stmt};

const MAX_ARGS: usize = 255;

/// What kind of `function` production is being parsed, purely to phrase
/// error messages the way the reference grammar's `function(kind)` helper
/// does ("Expect function name.", "Expect method name.").
#[derive(Clone, Copy)]
enum FunctionKind {
    Function,
    Method,
}

impl FunctionKind {
    fn label(self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Method => "method",
        }
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    handler: &'a Handler,
    ids: ExprIdGen,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            current: 0,
            handler,
            ids: ExprIdGen::new(),
        }
    }

    /// Parses the whole token stream into a statement list. Never fails
    /// outright: parse errors are reported through `handler` and recovered
    /// from via panic mode, so the result may be a partial program.
    pub fn parse(mut self) -> Vec<Stmt> {
        let span = tracing::debug_span!("parse").entered();
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        tracing::debug!(statements = statements.len(), "parse done");
        drop(span);
        statements
    }

    // ---- token stream primitives -----------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consumes the next token if it has `kind`, else reports `message` and
    /// returns `None` without consuming.
    fn consume(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(message);
            None
        }
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.peek().clone();
        self.error_at(&token, message);
    }

    fn error_at(&mut self, token: &Token, message: &str) {
        let location = if token.kind == TokenKind::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };
        self.handler.report_syntax(token.line, location, message);
    }

    /// Panic-mode recovery: discard tokens until a likely statement
    /// boundary so the parser can keep finding further errors in the same
    /// run instead of stopping at the first one.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            use TokenKind::*;
            if matches!(
                self.peek().kind,
                Class | Fun | Var | For | If | While | Print | Return
            ) {
                return;
            }
            self.advance();
        }
    }

    // ---- declarations -------------------------------------------------

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[TokenKind::Class]) {
            self.class_declaration()
        } else if self.matches(&[TokenKind::Fun]) {
            self.function(FunctionKind::Function).map(Stmt::Function)
        } else if self.matches(&[TokenKind::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        if result.is_none() {
            self.synchronize();
        }
        result
    }

    fn class_declaration(&mut self) -> Option<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?;

        let superclass = if self.matches(&[TokenKind::Less]) {
            let super_name = self.consume(TokenKind::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable {
                id: self.ids.next_id(),
                name: super_name,
            })
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(Rc::new(self.function(FunctionKind::Method)?));
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;

        Some(Stmt::Class(Rc::new(ClassDecl {
            name,
            superclass,
            methods,
        })))
    }

    fn function(&mut self, kind: FunctionKind) -> Option<FunctionDecl> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {} name.", kind.label()))?;
        self.consume(
            TokenKind::LeftParen,
            &format!("Expect '(' after {} name.", kind.label()),
        )?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    self.error_at_current("Can't have more than 255 parameters.");
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(
            TokenKind::LeftBrace,
            &format!("Expect '{{' before {} body.", kind.label()),
        )?;
        let body = self.block()?;

        Some(FunctionDecl { name, params, body })
    }

    fn var_declaration(&mut self) -> Option<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.matches(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Some(Stmt::Var { name, initializer })
    }

    // ---- statements -----------------------------------------------------

    fn statement(&mut self) -> Option<Stmt> {
        if self.matches(&[TokenKind::For]) {
            self.for_statement()
        } else if self.matches(&[TokenKind::If]) {
            self.if_statement()
        } else if self.matches(&[TokenKind::Print]) {
            self.print_statement()
        } else if self.matches(&[TokenKind::Return]) {
            self.return_statement()
        } else if self.matches(&[TokenKind::While]) {
            self.while_statement()
        } else if self.matches(&[TokenKind::LeftBrace]) {
            self.block().map(Stmt::Block)
        } else {
            self.expression_statement()
        }
    }

    fn for_statement(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[TokenKind::Semicolon]) {
            None
        } else if self.matches(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expr::Literal(LiteralValue::Bool(true)));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Some(body)
    }

    fn if_statement(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Some(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Option<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Some(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Option<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Some(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Some(Stmt::While { condition, body })
    }

    fn block(&mut self) -> Option<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Some(statements)
    }

    fn expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Some(Stmt::Expression(expr))
    }

    // ---- expressions, highest to lowest precedence ----------------------

    fn expression(&mut self) -> Option<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Option<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name, .. } => Some(Expr::Assign {
                    id: self.ids.next_id(),
                    name,
                    value: Box::new(value),
                }),
                Expr::Get { object, name } => Some(Expr::Set {
                    object,
                    name,
                    value: Box::new(value),
                }),
                _ => {
                    self.error_at(&equals, "Invalid assignment target.");
                    Some(expr)
                }
            };
        }

        Some(expr)
    }

    fn or(&mut self) -> Option<Expr> {
        let mut expr = self.and()?;
        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn and(&mut self) -> Option<Expr> {
        let mut expr = self.equality()?;
        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn equality(&mut self) -> Option<Expr> {
        let mut expr = self.comparison()?;
        while self.matches(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn comparison(&mut self) -> Option<Expr> {
        let mut expr = self.term()?;
        while self.matches(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn term(&mut self) -> Option<Expr> {
        let mut expr = self.factor()?;
        while self.matches(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn factor(&mut self) -> Option<Expr> {
        let mut expr = self.unary()?;
        while self.matches(&[TokenKind::Slash, TokenKind::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Some(expr)
    }

    fn unary(&mut self) -> Option<Expr> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Some(Expr::Unary(operator, Box::new(right)));
        }
        self.call()
    }

    fn call(&mut self) -> Option<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Some(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Option<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    self.error_at_current("Can't have more than 255 arguments.");
                }
                args.push(self.expression()?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;

        Some(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    fn primary(&mut self) -> Option<Expr> {
        if self.matches(&[TokenKind::False]) {
            return Some(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.matches(&[TokenKind::True]) {
            return Some(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.matches(&[TokenKind::Nil]) {
            return Some(Expr::Literal(LiteralValue::Nil));
        }
        if self.matches(&[TokenKind::Number]) {
            let literal = self.previous().literal.clone();
            return match literal {
                Some(TokenLiteral::Num(n)) => Some(Expr::Literal(LiteralValue::Num(n))),
                _ => unreachable!("scanner always attaches a Num literal to a Number token"),
            };
        }
        if self.matches(&[TokenKind::String]) {
            let literal = self.previous().literal.clone();
            return match literal {
                Some(TokenLiteral::Str(s)) => Some(Expr::Literal(LiteralValue::Str(s))),
                _ => unreachable!("scanner always attaches a Str literal to a String token"),
            };
        }
        if self.matches(&[TokenKind::Super]) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?;
            return Some(Expr::Super {
                id: self.ids.next_id(),
                keyword,
                method,
            });
        }
        if self.matches(&[TokenKind::This]) {
            let keyword = self.previous().clone();
            return Some(Expr::This {
                id: self.ids.next_id(),
                keyword,
            });
        }
        if self.matches(&[TokenKind::Identifier]) {
            let name = self.previous().clone();
            return Some(Expr::Variable {
                id: self.ids.next_id(),
                name,
            });
        }
        if self.matches(&[TokenKind::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Some(Expr::Grouping(Box::new(expr)));
        }

        self.error_at_current("Expect expression.");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_scan::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, Handler) {
        let handler = Handler::new();
        let tokens = Scanner::new(source, &handler).scan();
        let stmts = Parser::new(tokens, &handler).parse();
        (stmts, handler)
    }

    #[test]
    fn empty_source_parses_to_no_statements() {
        let (stmts, handler) = parse("");
        assert!(stmts.is_empty());
        assert!(!handler.had_syntax_error());
    }

    #[test]
    fn print_statement() {
        let (stmts, handler) = parse("print 1 + 2 * 3;");
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Print(_)));
        assert!(!handler.had_syntax_error());
    }

    #[test]
    fn binary_precedence_groups_multiplication_tighter() {
        let (stmts, _) = parse("1 + 2 * 3;");
        match &stmts[0] {
            Stmt::Expression(Expr::Binary(left, op, right)) => {
                assert!(matches!(**left, Expr::Literal(LiteralValue::Num(n)) if n == 1.0));
                assert_eq!(op.kind, TokenKind::Plus);
                assert!(matches!(**right, Expr::Binary(..)));
            }
            other => panic!("expected top-level binary +, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let (stmts, _) = parse("var a = 1; var b = 2; a = b = 3;");
        match &stmts[2] {
            Stmt::Expression(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::Assign { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn invalid_assignment_target_is_reported_but_recovers() {
        let (stmts, handler) = parse("1 + 2 = 3;");
        assert!(handler.had_syntax_error());
        // parsing still produced a statement instead of aborting
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn get_expression_becomes_set_on_assignment() {
        let (stmts, _) = parse("a.b = 1;");
        assert!(matches!(
            &stmts[0],
            Stmt::Expression(Expr::Set { .. })
        ));
    }

    #[test]
    fn for_loop_desugars_to_block_with_while() {
        let (stmts, _) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
        match &stmts[0] {
            Stmt::Block(inner) => {
                assert_eq!(inner.len(), 2);
                assert!(matches!(inner[0], Stmt::Var { .. }));
                assert!(matches!(inner[1], Stmt::While { .. }));
            }
            other => panic!("expected desugared block, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_with_all_clauses_omitted_uses_true_condition() {
        let (stmts, _) = parse("for (;;) print 1;");
        match &stmts[0] {
            Stmt::While { condition, .. } => {
                assert!(matches!(condition, Expr::Literal(LiteralValue::Bool(true))));
            }
            other => panic!("expected bare while, got {other:?}"),
        }
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let (stmts, handler) = parse("class B < A { method() { return 1; } }");
        assert!(!handler.had_syntax_error());
        match &stmts[0] {
            Stmt::Class(decl) => {
                assert!(decl.superclass.is_some());
                assert_eq!(decl.methods.len(), 1);
                assert_eq!(decl.methods[0].name.lexeme, "method");
            }
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn call_and_get_chain_left_to_right() {
        let (stmts, _) = parse("a.b().c;");
        match &stmts[0] {
            Stmt::Expression(Expr::Get { object, name }) => {
                assert_eq!(name.lexeme, "c");
                assert!(matches!(**object, Expr::Call { .. }));
            }
            other => panic!("expected trailing get, got {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let (_, handler) = parse("print 1");
        assert!(handler.had_syntax_error());
    }

    #[test]
    fn panic_mode_recovers_at_next_statement_keyword() {
        let (stmts, handler) = parse("var = ; print 1;");
        assert!(handler.had_syntax_error());
        // recovery should still let the trailing print through
        assert!(stmts.iter().any(|s| matches!(s, Stmt::Print(_))));
    }

    #[test]
    fn more_than_255_arguments_reports_but_continues() {
        let args: Vec<String> = (0..300).map(|n| n.to_string()).collect();
        let source = format!("f({});", args.join(", "));
        let (stmts, handler) = parse(&source);
        assert!(handler.had_syntax_error());
        assert_eq!(stmts.len(), 1);
    }
}
