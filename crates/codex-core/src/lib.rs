//! Codex language toolchain: lexer, parser, tree-walking interpreter,
//! stack-bytecode compiler and multi-unit linker.

pub mod ast;
pub mod bytecode;
pub mod diagnostics;
pub mod interpreter;
pub mod linker;
pub mod parser;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use ast::{Node, Program};
pub use bytecode::{BytecodeUnit, LinkedProgram};
pub use diagnostics::Diagnostic;
pub use interpreter::{Interpreter, InterpreterConfig, RuntimeError, Value};
pub use linker::{LinkError, LinkOptions, Linker};
pub use parser::{LexError, ParseError};
pub use pipeline::{CompileReport, Pipeline, PipelineError};

/// Interpret `source`, printing to stdout
pub fn run(source: &str) -> Result<Value, PipelineError> {
    Pipeline::new(source, "<input>").run_all()
}

/// Compile `source` to object-code text
pub fn compile(source: &str) -> Result<String, PipelineError> {
    Pipeline::new(source, "<input>")
        .compile_all()
        .map(|unit| unit.to_object_code())
}
