//! Staged driver for Codex source text
//!
//! ```no_run
//! # use codex_core::pipeline::Pipeline;
//! let pipeline = Pipeline::new("let x = 1 + 2\nprint(x)", "example.cdx");
//!
//! match pipeline.run_all() {
//!     Ok(value) => println!("Result: {value}"),
//!     Err(e) => eprintln!("{}", e.format_with_source(pipeline.source(), pipeline.filename())),
//! }
//! ```
//!
//! Stages can also be driven one at a time:
//!
//! ```no_run
//! # use codex_core::pipeline::Pipeline;
//! let pipeline = Pipeline::new("print(1)", "example.cdx");
//! let program = pipeline.parse()?;
//! let unit = pipeline.compile(&program);
//! println!("{}", unit.to_object_code());
//! # Ok::<(), codex_core::pipeline::PipelineError>(())
//! ```

use crate::ast::Program;
use crate::bytecode::{self, BytecodeUnit};
use crate::diagnostics::Diagnostic;
use crate::interpreter::{Interpreter, InterpreterConfig, RuntimeError, Value};
use crate::parser::{self, LexError, LexMode, ParseError, Token};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("SyntaxError: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl PipelineError {
    pub fn diagnostic(&self, filename: &str) -> Diagnostic {
        match self {
            PipelineError::Lex(e) => Diagnostic::from_lex_error(e, filename),
            PipelineError::Parse(e) => Diagnostic::from_parse_error(e, filename),
            PipelineError::Runtime(e) => Diagnostic::from_runtime_error(e, filename),
        }
    }

    /// Format error with source code context
    pub fn format_with_source(&self, source: &str, filename: &str) -> String {
        self.diagnostic(filename).format(source)
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Outcome of one compilation, in the shape storage collaborators persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileReport {
    pub source: String,
    pub object_code: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl CompileReport {
    pub fn success(source: impl Into<String>, object_code: impl Into<String>) -> Self {
        CompileReport {
            source: source.into(),
            object_code: Some(object_code.into()),
            success: true,
            error: None,
        }
    }

    pub fn failure(source: impl Into<String>, error: &PipelineError) -> Self {
        CompileReport {
            source: source.into(),
            object_code: None,
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

pub struct Pipeline {
    source: String,
    /// Used for diagnostics and as the compiled unit's name
    filename: String,
    lex_mode: LexMode,
    config: InterpreterConfig,
}

impl Pipeline {
    pub fn new(source: impl Into<String>, filename: impl Into<String>) -> Self {
        Pipeline {
            source: source.into(),
            filename: filename.into(),
            lex_mode: LexMode::default(),
            config: InterpreterConfig::default(),
        }
    }

    pub fn with_lex_mode(mut self, mode: LexMode) -> Self {
        self.lex_mode = mode;
        self
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tokenize(&self) -> PipelineResult<Vec<Token>> {
        Ok(parser::lexer::tokenize(&self.source, self.lex_mode)?)
    }

    pub fn parse(&self) -> PipelineResult<Program> {
        let tokens = self.tokenize()?;
        Ok(parser::parse(tokens)?)
    }

    /// Lower the AST to a bytecode unit named after the source file. This
    /// stage cannot fail.
    pub fn compile(&self, program: &Program) -> BytecodeUnit {
        bytecode::compile_unit(program, &self.unit_name())
    }

    /// Interpret `program` with `print` going to stdout
    pub fn interpret(&self, program: &Program) -> PipelineResult<Value> {
        let mut interpreter = Interpreter::new().with_config(self.config);
        Ok(interpreter.interpret(program)?)
    }

    pub fn interpret_with<W: Write>(&self, program: &Program, out: &mut W) -> PipelineResult<Value> {
        let mut interpreter = Interpreter::with_output(out).with_config(self.config);
        Ok(interpreter.interpret(program)?)
    }

    /// lex → parse → interpret
    pub fn run_all(&self) -> PipelineResult<Value> {
        let program = self.parse()?;
        self.interpret(&program)
    }

    /// lex → parse → compile
    pub fn compile_all(&self) -> PipelineResult<BytecodeUnit> {
        let program = self.parse()?;
        Ok(self.compile(&program))
    }

    pub fn compile_report(&self) -> CompileReport {
        match self.compile_all() {
            Ok(unit) => CompileReport::success(self.source.as_str(), unit.to_object_code()),
            Err(e) => {
                log::debug!("compilation of {} failed: {}", self.filename, e);
                CompileReport::failure(self.source.as_str(), &e)
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    fn unit_name(&self) -> String {
        if self.filename == "-" {
            return "<stdin>".to_string();
        }
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.filename.clone())
    }
}
