//! User-facing rendering of lexer, parser, runtime and link errors
//!
//! A [`Diagnostic`] carries a message and, when the error knows one, a
//! 1-based line/column position. [`Diagnostic::format`] prints the offending
//! source line with a caret under the column.

use crate::interpreter::RuntimeError;
use crate::linker::LinkError;
use crate::parser::{LexError, ParseError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Lex,
    Parse,
    Runtime,
    Link,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Lex => "lex",
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Runtime => "runtime",
            DiagnosticKind::Link => "link",
        }
    }
}

/// Line and column, both 1-based; columns count characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub position: Option<Position>,
    pub filename: String,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            filename: filename.into(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn from_lex_error(err: &LexError, filename: &str) -> Self {
        let (line, column) = err.position();
        Self::error(DiagnosticKind::Lex, err.to_string(), filename).at(line, column)
    }

    pub fn from_parse_error(err: &ParseError, filename: &str) -> Self {
        let (line, column) = err.position();
        let diag = Self::error(DiagnosticKind::Parse, err.to_string(), filename).at(line, column);
        match err {
            ParseError::InvalidNumber { .. } => {
                diag.with_help("number literals are digits with at most one '.'")
            }
            ParseError::UnexpectedToken { .. } => diag,
        }
    }

    pub fn from_runtime_error(err: &RuntimeError, filename: &str) -> Self {
        let diag = Self::error(DiagnosticKind::Runtime, err.to_string(), filename);
        match err {
            RuntimeError::CallDepthExceeded { .. } => {
                diag.with_help("raise the limit with --max-call-depth")
            }
            _ => diag,
        }
    }

    pub fn from_link_error(err: &LinkError, filename: &str) -> Self {
        Self::error(DiagnosticKind::Link, err.to_string(), filename)
    }

    /// Render with a snippet of `source` when the position is known
    pub fn format(&self, source: &str) -> String {
        let mut output = format!("error[{}]: {}\n", self.kind.as_str(), self.message);

        match self.position {
            Some(Position { line, column }) => {
                output.push_str(&format!("  --> {}:{}:{}\n", self.filename, line, column));
                output.push_str(&snippet(source, line, column));
            }
            None => output.push_str(&format!("  --> {}\n", self.filename)),
        }

        for note in &self.notes {
            output.push_str(&format!("note: {note}\n"));
        }
        if let Some(help) = &self.help {
            output.push_str(&format!("help: {help}\n"));
        }
        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "error: {} at {}:{}:{}", self.message, self.filename, p.line, p.column),
            None => write!(f, "error: {} in {}", self.message, self.filename),
        }
    }
}

fn snippet(source: &str, line: usize, column: usize) -> String {
    // EOF positions may point one line past the last newline
    let text = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let width = line.to_string().len();
    let pad = column.saturating_sub(1).min(text.chars().count());

    let mut output = format!("{:width$} |\n", "");
    output.push_str(&format!("{line:width$} | {text}\n"));
    output.push_str(&format!("{:width$} | {}^\n", "", " ".repeat(pad)));
    output
}
