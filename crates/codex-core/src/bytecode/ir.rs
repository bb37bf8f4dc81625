use super::listing;
use crate::ast::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Number(f64),
    String(String),
    /// Pushed by a bare `return`
    None,
}

impl Constant {
    /// Literal form used in listings: `10.0`, `'text'`, `None`
    pub fn repr(&self) -> String {
        match self {
            Constant::Number(n) => format_number(*n),
            Constant::String(s) => quote(s),
            Constant::None => "None".to_string(),
        }
    }
}

/// Quote a string for listings. Single quotes unless the text contains a
/// single quote and no double quote.
pub(crate) fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\x7f' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    LoadConst(usize), // constant pool index
    LoadVar(String),
    StoreVar(String), // pops value
    BinaryAdd,
    BinarySub,
    BinaryMul,
    BinaryDiv,
    BinaryEq,
    BinaryNeq,
    BinaryLt,
    BinaryGt,
    UnaryPlus,
    UnaryMinus,
    CallFunc { name: String, arity: usize },
    Return,
    Jump(usize),        // absolute instruction index
    JumpIfFalse(usize), // absolute instruction index, pops condition
    Print,
}

impl Instruction {
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::LoadConst(_) => "LOAD_CONST",
            Instruction::LoadVar(_) => "LOAD_VAR",
            Instruction::StoreVar(_) => "STORE_VAR",
            Instruction::BinaryAdd => "BINARY_ADD",
            Instruction::BinarySub => "BINARY_SUB",
            Instruction::BinaryMul => "BINARY_MUL",
            Instruction::BinaryDiv => "BINARY_DIV",
            Instruction::BinaryEq => "BINARY_EQ",
            Instruction::BinaryNeq => "BINARY_NEQ",
            Instruction::BinaryLt => "BINARY_LT",
            Instruction::BinaryGt => "BINARY_GT",
            Instruction::UnaryPlus => "UNARY_PLUS",
            Instruction::UnaryMinus => "UNARY_MINUS",
            Instruction::CallFunc { .. } => "CALL_FUNC",
            Instruction::Return => "RETURN",
            Instruction::Jump(_) => "JUMP",
            Instruction::JumpIfFalse(_) => "JUMP_IF_FALSE",
            Instruction::Print => "PRINT",
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, Instruction::Jump(_) | Instruction::JumpIfFalse(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opcode = self.opcode();
        match self {
            Instruction::LoadConst(idx) => write!(f, "{opcode} {idx}"),
            Instruction::LoadVar(name) | Instruction::StoreVar(name) => {
                write!(f, "{opcode} {name}")
            }
            Instruction::CallFunc { name, arity } => {
                write!(f, "{opcode} ({}, {arity})", quote(name))
            }
            Instruction::Jump(target) | Instruction::JumpIfFalse(target) => {
                write!(f, "{opcode} {target}")
            }
            _ => f.write_str(opcode),
        }
    }
}

/// A function body compiled by its own compiler instance. Its constant
/// indices point into `constants`, never into the enclosing unit's pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledFunction {
    pub instructions: Vec<Instruction>,
    pub constants: Vec<Constant>,
}

/// Name-keyed table that keeps first-definition order. Re-inserting a name
/// replaces the entry in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for FunctionTable<T> {
    fn default() -> Self {
        FunctionTable {
            entries: Vec::new(),
        }
    }
}

impl<T> FunctionTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> IntoIterator for FunctionTable<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Errors reading or writing a serialized unit
#[derive(Debug, thiserror::Error)]
pub enum UnitFormatError {
    #[error("failed to serialize unit: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to read unit: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

/// One translation unit's compiler output ("object file")
///
/// `exports` and `imports` are filled in by whoever drives the compiler; the
/// compiler itself never derives them from the program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BytecodeUnit {
    pub name: String,
    pub instructions: Vec<Instruction>,
    pub constants: Vec<Constant>,
    pub functions: FunctionTable<CompiledFunction>,
    pub exports: Vec<String>,
    pub imports: Vec<String>,
}

impl BytecodeUnit {
    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Text listing of the unit (`CONSTANTS:`, `CODE:`, `FUNCTIONS:`)
    pub fn to_object_code(&self) -> String {
        listing::render(
            listing::OBJECT_HEADER,
            &self.constants,
            &self.instructions,
            self.functions
                .iter()
                .map(|(name, f)| (name, f.instructions.as_slice())),
            None,
        )
    }

    pub fn to_ron(&self) -> Result<String, UnitFormatError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn from_ron(text: &str) -> Result<Self, UnitFormatError> {
        Ok(ron::from_str(text)?)
    }
}

/// The merged output of the linker. Execution starts at `entry_point`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedProgram {
    pub constants: Vec<Constant>,
    pub instructions: Vec<Instruction>,
    pub functions: FunctionTable<Vec<Instruction>>,
    pub entry_point: usize,
}

impl LinkedProgram {
    pub fn to_executable(&self) -> String {
        listing::render(
            listing::EXECUTABLE_HEADER,
            &self.constants,
            &self.instructions,
            self.functions.iter().map(|(name, f)| (name, f.as_slice())),
            Some(self.entry_point),
        )
    }
}
