//! lox-scan - turns Lox source text into a token stream.
//!
//! The scanner makes a single left-to-right pass over the source bytes and
//! never fails outright: unterminated strings and unexpected characters are
//! reported through the shared [`lox_util::Handler`] and scanning continues,
//! so one run can surface every lexical error in a file rather than just the
//! first.

mod cursor;
mod scanner;
mod token;

pub mod edge_cases;

pub use cursor::Cursor;
pub use scanner::Scanner;
pub use token::{Literal, Token, TokenKind};
