//! Hand-written lexer for Codex source text
//!
//! The lexer materializes the whole token sequence up front. Newlines are
//! significant tokens; `#` starts a comment that runs to the end of the line.
//!
//! In the default [`LexMode::Lenient`] mode, characters that match no rule are
//! dropped without an error, and so is a `!` that is not followed by `=`.
//! [`LexMode::Strict`] reports both as [`LexError::UnexpectedCharacter`].

use super::errors::LexError;
use super::token::{Token, TokenKind};

/// How the lexer treats input that matches no token rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    #[default]
    Lenient,
    Strict,
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    mode: LexMode,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::with_mode(source, LexMode::Lenient)
    }

    pub fn strict(source: &str) -> Self {
        Self::with_mode(source, LexMode::Strict)
    }

    pub fn with_mode(source: &str, mode: LexMode) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            mode,
            tokens: Vec::new(),
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            text.push(c);
            self.advance();
        }
        self.push(TokenKind::Number, text, line, column);
    }

    fn read_string(&mut self) {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut text = String::new();
        while let Some(c) = self.current() {
            if c == '"' {
                break;
            }
            if c == '\\' {
                // The escaped character is copied as-is, `\n` stays an `n`.
                self.advance();
                if let Some(escaped) = self.current() {
                    text.push(escaped);
                    self.advance();
                }
            } else {
                text.push(c);
                self.advance();
            }
        }
        self.advance(); // closing quote, no-op at end of input
        self.push(TokenKind::String, text, line, column);
    }

    fn read_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.advance();
        }
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.push(kind, text, line, column);
    }

    fn unmatched(&self, ch: char) -> Result<(), LexError> {
        match self.mode {
            LexMode::Lenient => {
                log::debug!(
                    "skipping unrecognized character {:?} at {}:{}",
                    ch,
                    self.line,
                    self.column
                );
                Ok(())
            }
            LexMode::Strict => Err(LexError::UnexpectedCharacter {
                ch,
                line: self.line,
                column: self.column,
            }),
        }
    }

    /// Tokenize the entire source. The result always ends with an EOF token.
    ///
    /// # Errors
    ///
    /// Only in [`LexMode::Strict`], for characters no rule accepts.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while self.current().is_some() {
            self.skip_whitespace();

            let Some(c) = self.current() else {
                break;
            };

            if c == '#' {
                self.skip_comment();
                continue;
            }

            if c == '\n' {
                self.push(TokenKind::Newline, "\\n", self.line, self.column);
                self.advance();
                continue;
            }

            if c.is_ascii_digit() {
                self.read_number();
                continue;
            }

            if c == '"' {
                self.read_string();
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                self.read_identifier();
                continue;
            }

            let (line, column) = (self.line, self.column);
            let single = match c {
                '+' => Some(TokenKind::Plus),
                '-' => Some(TokenKind::Minus),
                '*' => Some(TokenKind::Star),
                '/' => Some(TokenKind::Slash),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                '{' => Some(TokenKind::LBrace),
                '}' => Some(TokenKind::RBrace),
                ';' => Some(TokenKind::Semicolon),
                ',' => Some(TokenKind::Comma),
                '<' => Some(TokenKind::Less),
                '>' => Some(TokenKind::Greater),
                _ => None,
            };

            match (c, single) {
                (_, Some(kind)) => self.push(kind, c.to_string(), line, column),
                ('=', None) => {
                    if self.peek() == Some('=') {
                        self.advance();
                        self.push(TokenKind::EqualEqual, "==", line, column);
                    } else {
                        self.push(TokenKind::Assign, "=", line, column);
                    }
                }
                ('!', None) => {
                    if self.peek() == Some('=') {
                        self.advance();
                        self.push(TokenKind::BangEqual, "!=", line, column);
                    } else {
                        self.unmatched(c)?;
                    }
                }
                _ => self.unmatched(c)?,
            }

            self.advance();
        }

        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, "", line, column);
        Ok(self.tokens)
    }
}

/// Tokenize `source` with the given mode
pub fn tokenize(source: &str, mode: LexMode) -> Result<Vec<Token>, LexError> {
    Lexer::with_mode(source, mode).tokenize()
}
