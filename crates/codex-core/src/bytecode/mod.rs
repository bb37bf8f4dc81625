//! Stack bytecode: instruction set, compiler and object-code listings

pub mod compile;
mod helpers;
pub mod ir;
pub mod listing;

pub use compile::{compile_program, compile_unit};
pub use ir::{
    BytecodeUnit, CompiledFunction, Constant, FunctionTable, Instruction, LinkedProgram,
    UnitFormatError,
};
