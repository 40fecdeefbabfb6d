//! Source text to token stream, one pass, never aborts.

use lox_util::Handler;

use crate::cursor::Cursor;
use crate::token::{keyword, Literal, Token, TokenKind};

/// Scans `source` into a token sequence terminated by a single `Eof` token.
///
/// Lexical errors (unterminated strings, unexpected characters) are
/// reported through `handler` and scanning continues; the returned sequence
/// may simply have fewer tokens than a valid input would yield.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            tokens: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Vec<Token> {
        let span = tracing::debug_span!("scan").entered();
        while !self.cursor.is_at_end() {
            self.scan_token();
        }
        let line = self.cursor.line();
        self.tokens.push(Token::new(TokenKind::Eof, "", None, line));
        tracing::debug!(tokens = self.tokens.len(), "scan done");
        drop(span);
        self.tokens
    }

    fn scan_token(&mut self) {
        let start = self.cursor.position();
        let line = self.cursor.line();
        let c = self.cursor.advance();

        use TokenKind::*;
        match c {
            '(' => self.emit(LeftParen, start, line),
            ')' => self.emit(RightParen, start, line),
            '{' => self.emit(LeftBrace, start, line),
            '}' => self.emit(RightBrace, start, line),
            ',' => self.emit(Comma, start, line),
            '.' => self.emit(Dot, start, line),
            '-' => self.emit(Minus, start, line),
            '+' => self.emit(Plus, start, line),
            ';' => self.emit(Semicolon, start, line),
            '*' => self.emit(Star, start, line),

            '!' => {
                let kind = if self.cursor.match_char('=') { BangEqual } else { Bang };
                self.emit(kind, start, line);
            }
            '=' => {
                let kind = if self.cursor.match_char('=') { EqualEqual } else { Equal };
                self.emit(kind, start, line);
            }
            '<' => {
                let kind = if self.cursor.match_char('=') { LessEqual } else { Less };
                self.emit(kind, start, line);
            }
            '>' => {
                let kind = if self.cursor.match_char('=') { GreaterEqual } else { Greater };
                self.emit(kind, start, line);
            }

            '/' => {
                if self.cursor.match_char('/') {
                    while self.cursor.peek() != '\n' && !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                } else {
                    self.emit(Slash, start, line);
                }
            }

            ' ' | '\t' | '\r' | '\n' => {}

            '"' => self.scan_string(start, line),

            c if c.is_ascii_digit() => self.scan_number(start, line),
            c if is_identifier_start(c) => self.scan_identifier(start, line),

            _ => self
                .handler
                .report_syntax(line, "", "Unexpected character."),
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize, line: u32) {
        let lexeme = self.cursor.slice_from(start).to_string();
        self.tokens.push(Token::new(kind, lexeme, None, line));
    }

    fn scan_string(&mut self, start: usize, start_line: u32) {
        while self.cursor.peek() != '"' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            self.handler
                .report_syntax(start_line, "", "Unterminated string.");
            return;
        }

        // consume closing quote
        self.cursor.advance();

        let raw = self.cursor.slice_from(start);
        let value = raw[1..raw.len() - 1].to_string();
        let lexeme = raw.to_string();
        self.tokens.push(Token::new(
            TokenKind::String,
            lexeme,
            Some(Literal::Str(value)),
            start_line,
        ));
    }

    fn scan_number(&mut self, start: usize, line: u32) {
        while self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.peek() == '.' && self.cursor.peek_next().is_ascii_digit() {
            self.cursor.advance(); // the '.'
            while self.cursor.peek().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let lexeme = self.cursor.slice_from(start).to_string();
        // `synchronize`-adjacent code guarantees this parses: every char
        // consumed above is an ASCII digit or a single interior '.'.
        let value: f64 = lexeme.parse().expect("scanned digits form a valid f64");
        self.tokens.push(Token::new(
            TokenKind::Number,
            lexeme,
            Some(Literal::Num(value)),
            line,
        ));
    }

    fn scan_identifier(&mut self, start: usize, line: u32) {
        while is_identifier_continue(self.cursor.peek()) {
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(start).to_string();
        let kind = keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, lexeme, None, line));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
