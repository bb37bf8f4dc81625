//! Object-code text shared by unit dumps and linked executables
//!
//! ```text
//! # Codex Object Code
//!
//! CONSTANTS:
//!   0: 10.0
//!
//! CODE:
//!      0: LOAD_CONST 0
//!      1: STORE_VAR x
//!
//! FUNCTIONS:
//!   f:
//!        0: LOAD_CONST 0
//!
//! ```
//!
//! Executables use the `# Codex Executable` header and end with an
//! `ENTRY_POINT: <n>` line.

use super::ir::{Constant, Instruction};

pub const OBJECT_HEADER: &str = "# Codex Object Code";
pub const EXECUTABLE_HEADER: &str = "# Codex Executable";

pub(super) fn render<'a>(
    header: &str,
    constants: &[Constant],
    instructions: &[Instruction],
    functions: impl Iterator<Item = (&'a str, &'a [Instruction])>,
    entry_point: Option<usize>,
) -> String {
    let mut lines = vec![header.to_string(), String::new()];

    lines.push("CONSTANTS:".to_string());
    for (i, constant) in constants.iter().enumerate() {
        lines.push(format!("  {i}: {}", constant.repr()));
    }
    lines.push(String::new());

    lines.push("CODE:".to_string());
    for (i, instr) in instructions.iter().enumerate() {
        lines.push(format!("  {i:4}: {instr}"));
    }
    lines.push(String::new());

    let mut functions = functions.peekable();
    if functions.peek().is_some() {
        lines.push("FUNCTIONS:".to_string());
        for (name, code) in functions {
            lines.push(format!("  {name}:"));
            for (i, instr) in code.iter().enumerate() {
                lines.push(format!("    {i:4}: {instr}"));
            }
            lines.push(String::new());
        }
    }

    if let Some(entry) = entry_point {
        lines.push(format!("ENTRY_POINT: {entry}"));
    }

    lines.join("\n")
}
