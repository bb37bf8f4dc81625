//! Lexer and parser error types

use super::token::TokenKind;
use std::fmt;

/// Raised by the lexer in strict mode only
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnexpectedCharacter { ch: char, line: usize, column: usize },
}

impl LexError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnexpectedCharacter { line, column, .. } => (*line, *column),
        }
    }
}

/// What the parser was looking for when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Expression => f.write_str("expression"),
        }
    }
}

/// A syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at line {line}")]
    UnexpectedToken {
        expected: Expected,
        found: TokenKind,
        line: usize,
        column: usize,
    },
    #[error("invalid number literal '{lexeme}' at line {line}")]
    InvalidNumber {
        lexeme: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::UnexpectedToken { line, column, .. }
            | ParseError::InvalidNumber { line, column, .. } => (*line, *column),
        }
    }
}
