//! Binary and unary operator semantics

use super::errors::RuntimeError;
use super::value::Value;
use crate::ast::{BinaryOp, UnaryOp};

pub fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (l, r) => Err(unsupported(op, &l, &r)),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            let (a, b) = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => (*a, *b),
                _ => return Err(unsupported(op, &left, &right)),
            };
            match op {
                BinaryOp::Sub => Ok(Value::Number(a - b)),
                BinaryOp::Mul => Ok(Value::Number(a * b)),
                _ if b == 0.0 => Err(RuntimeError::DivisionByZero),
                _ => Ok(Value::Number(a / b)),
            }
        }
        BinaryOp::Less | BinaryOp::Greater => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(unsupported(op, &left, &right)),
            };
            let wanted = if op == BinaryOp::Less {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            };
            Ok(Value::Bool(ordering == Some(wanted)))
        }
    }
}

pub fn unary(op: UnaryOp, operand: Value) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
        (UnaryOp::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
        (op, other) => Err(RuntimeError::type_error(format!(
            "bad operand type for unary {op}: {}",
            other.type_name()
        ))),
    }
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand types for {op}: {} and {}",
        left.type_name(),
        right.type_name()
    ))
}
