use crate::ast::{FunctionDef, format_number};
use std::fmt;
use std::rc::Rc;

/// A runtime value of the tree-walking interpreter
///
/// Functions are first-class: defining one binds the definition itself under
/// its name. There are no closures, so a function value carries nothing but
/// its definition.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    None,
    Function(Rc<FunctionDef>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::None => "none",
            Value::Function(_) => "function",
        }
    }

    /// `false`, `None`, `0` and `""` are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::None => false,
            Value::Function(_) => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::None => f.write_str("None"),
            Value::Function(def) => write!(f, "<function {}>", def.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(10.0).to_string(), "10.0");
        assert_eq!(Value::Number(-3.0).to_string(), "-3.0");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn test_other_display() {
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::None.to_string(), "None");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(!Value::None.is_truthy());
        assert!(Value::Bool(true).is_truthy());
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let def = Rc::new(FunctionDef {
            name: "f".into(),
            parameters: vec![],
            body: vec![],
        });
        let same = Value::Function(def.clone());
        assert_eq!(Value::Function(def.clone()), same);
        let other = Value::Function(Rc::new((*def).clone()));
        assert_ne!(same, other);
    }
}
