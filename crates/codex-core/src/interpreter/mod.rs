//! Tree-walking interpreter for Codex
//!
//! Executes a [`Program`] directly. State is one global scope plus a call
//! stack of local scopes (see [`Environment`]). Function calls push a scope
//! holding only the parameters, so functions see globals and their own
//! parameters, never the caller's locals.
//!
//! `return` travels as [`Flow::Return`] up to the nearest call boundary.
//! Without one, a call evaluates to the value of the last statement it ran.

mod errors;
mod operators;
mod scope;
mod value;

pub use errors::RuntimeError;
pub use scope::{Environment, Scope};
pub use value::Value;

use crate::ast::{FunctionDef, Node, Program};
use std::io::{self, Write};
use std::rc::Rc;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Upper bound on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

// Remaining native stack that triggers growth, and the size of each new segment
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Outcome of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(Value),
    Return(Value),
}

pub struct Interpreter<W: Write = io::Stdout> {
    env: Environment,
    config: InterpreterConfig,
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            env: Environment::new(),
            config: InterpreterConfig::default(),
            out,
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a program and return the value of its last statement.
    ///
    /// Globals persist across calls, which the REPL relies on. A top-level
    /// `return` ends the program with its value.
    pub fn interpret(&mut self, program: &Program) -> RuntimeResult<Value> {
        match self.execute_block(&program.statements)? {
            Flow::Continue(value) | Flow::Return(value) => Ok(value),
        }
    }

    fn execute_block(&mut self, statements: &[Node]) -> RuntimeResult<Flow> {
        let mut last = Value::None;
        for statement in statements {
            match self.execute(statement)? {
                Flow::Continue(value) => last = value,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Continue(last))
    }

    /// Execute one node, growing the native stack when deep recursion needs it
    pub fn execute(&mut self, node: &Node) -> RuntimeResult<Flow> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.execute_inner(node))
    }

    fn execute_inner(&mut self, node: &Node) -> RuntimeResult<Flow> {
        let value = match node {
            Node::Number(n) => Value::Number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Identifier(name) => self.env.get(name)?.clone(),
            Node::BinaryOp { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                operators::binary(*op, left, right)?
            }
            Node::UnaryOp { op, operand } => {
                let operand = self.evaluate(operand)?;
                operators::unary(*op, operand)?
            }
            Node::Assignment { name, value } => {
                let value = self.evaluate(value)?;
                self.env.set(name, value.clone());
                value
            }
            Node::Call { name, arguments } => self.call(name, arguments)?,
            Node::FunctionDef(def) => {
                self.env.set(&def.name, Value::Function(Rc::new(def.clone())));
                Value::None
            }
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute_block(then_body);
                }
                match else_body {
                    Some(body) => return self.execute_block(body),
                    None => Value::None,
                }
            }
            Node::While { condition, body } => return self.execute_while(condition, body),
            Node::Return(value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            Node::Print(value) => {
                let value = self.evaluate(value)?;
                writeln!(self.out, "{value}").map_err(|e| RuntimeError::Output {
                    message: e.to_string(),
                })?;
                Value::None
            }
        };
        Ok(Flow::Continue(value))
    }

    /// Evaluate a node in expression position
    fn evaluate(&mut self, node: &Node) -> RuntimeResult<Value> {
        match self.execute(node)? {
            Flow::Continue(value) => Ok(value),
            Flow::Return(_) => Err(RuntimeError::Unsupported {
                message: "'return' cannot appear inside an expression".to_string(),
            }),
        }
    }

    fn execute_while(&mut self, condition: &Node, body: &[Node]) -> RuntimeResult<Flow> {
        let mut last = Value::None;
        while self.evaluate(condition)?.is_truthy() {
            match self.execute_block(body)? {
                Flow::Continue(value) => last = value,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Continue(last))
    }

    fn call(&mut self, name: &str, arguments: &[Node]) -> RuntimeResult<Value> {
        let def = match self.env.get(name)? {
            Value::Function(def) => Rc::clone(def),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "'{name}' is not a function (found {})",
                    other.type_name()
                )));
            }
        };

        // Arguments are evaluated in the caller's scope, left to right
        let args = arguments
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<RuntimeResult<Vec<_>>>()?;

        if args.len() != def.parameters.len() {
            return Err(RuntimeError::ArityError {
                name: name.to_string(),
                expected: def.parameters.len(),
                found: args.len(),
            });
        }
        if self.env.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        log::trace!("call {name}/{} at depth {}", args.len(), self.env.depth());
        self.env.push_scope(bind_parameters(&def, args));
        let result = self.execute_block(&def.body);
        self.env.pop_scope();

        match result? {
            Flow::Continue(value) | Flow::Return(value) => Ok(value),
        }
    }
}

fn bind_parameters(def: &FunctionDef, args: Vec<Value>) -> Scope {
    def.parameters.iter().cloned().zip(args).collect()
}
