//! Error types for interpreter runtime errors

/// A fatal error raised while interpreting a program
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("NameError: variable '{name}' is not defined")]
    NameError { name: String },
    #[error("TypeError: {message}")]
    TypeError { message: String },
    #[error("ArityError: function '{name}' expects {expected} arguments, got {found}")]
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("RuntimeError: division by zero")]
    DivisionByZero,
    #[error("RuntimeError: maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
    #[error("RuntimeError: {message}")]
    Unsupported { message: String },
    #[error("RuntimeError: failed to write output: {message}")]
    Output { message: String },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
        }
    }
}
