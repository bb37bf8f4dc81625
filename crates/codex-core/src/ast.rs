//! Abstract Syntax Tree definitions for Codex
//!
//! A program is a flat list of statements. Every construct of the language,
//! statement or expression, is a variant of the single [`Node`] enum, which
//! both the interpreter and the bytecode compiler match exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of a parsed source file
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Node>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Node {
    Number(f64),
    String(String),
    Identifier(String),
    BinaryOp {
        left: Box<Node>,
        op: BinaryOp,
        right: Box<Node>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    Call {
        name: String,
        arguments: Vec<Node>,
    },
    FunctionDef(FunctionDef),
    If {
        condition: Box<Node>,
        then_body: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    Return(Option<Box<Node>>),
    Print(Box<Node>),
}

/// A named function with positional parameters
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Node>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Render a number literal the way listings and `print` show it.
///
/// Whole numbers keep one decimal (`10.0`) and others use the shortest
/// round-trip form. Decimal exponents of 16 and above or below -4 switch to
/// exponent notation with a signed, two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        return format!("{sign}inf");
    }
    if n != 0.0 {
        let scientific = format!("{n:e}");
        if let Some((mantissa, exp)) = scientific.split_once('e') {
            if let Ok(exp) = exp.parse::<i32>() {
                if !(-4..16).contains(&exp) {
                    let sign = if exp < 0 { '-' } else { '+' };
                    return format!("{mantissa}e{sign}{:02}", exp.abs());
                }
            }
        }
    }
    if n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}
