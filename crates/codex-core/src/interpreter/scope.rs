//! Variable storage: one global scope plus a stack of call scopes

use super::errors::RuntimeError;
use super::value::Value;
use std::collections::HashMap;

pub type Scope = HashMap<String, Value>;

#[derive(Debug, Default)]
pub struct Environment {
    globals: Scope,
    call_stack: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost call scope first, then globals. Enclosing call scopes are
    /// never consulted.
    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.call_stack
            .last()
            .and_then(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
            .ok_or_else(|| RuntimeError::NameError {
                name: name.to_string(),
            })
    }

    /// Writes always land in the innermost scope, shadowing any global
    pub fn set(&mut self, name: &str, value: Value) {
        let scope = self.call_stack.last_mut().unwrap_or(&mut self.globals);
        scope.insert(name.to_string(), value);
    }

    pub fn push_scope(&mut self, scope: Scope) {
        self.call_stack.push(scope);
    }

    pub fn pop_scope(&mut self) -> Option<Scope> {
        self.call_stack.pop()
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_write_and_read() {
        let mut env = Environment::new();
        env.set("x", Value::Number(1.0));
        assert_eq!(env.get("x"), Ok(&Value::Number(1.0)));
    }

    #[test]
    fn test_local_shadows_global_without_mutating_it() {
        let mut env = Environment::new();
        env.set("x", Value::Number(1.0));
        env.push_scope(Scope::new());
        env.set("x", Value::Number(2.0));
        assert_eq!(env.get("x"), Ok(&Value::Number(2.0)));
        env.pop_scope();
        assert_eq!(env.get("x"), Ok(&Value::Number(1.0)));
    }

    #[test]
    fn test_enclosing_call_scope_is_invisible() {
        let mut env = Environment::new();
        let mut outer = Scope::new();
        outer.insert("a".into(), Value::Number(1.0));
        env.push_scope(outer);
        env.push_scope(Scope::new());
        assert!(matches!(env.get("a"), Err(RuntimeError::NameError { .. })));
        assert_eq!(env.depth(), 2);
    }
}
