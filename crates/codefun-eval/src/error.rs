//! Runtime error types for the evaluator.

use crate::value::Value;
use std::fmt;

/// Evaluation error.
///
/// `Return`, `Break`, and `Continue` are control-flow signals that never
/// escape the evaluator; everything else is surfaced to the user as a
/// message.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Read or write of a name that is not defined.
    UndefinedVariable(String),
    /// Call of a name that is not defined — the classic missing
    /// challenge entry point.
    UndefinedFunction(String),
    /// Call of a name bound to a non-function value.
    NotCallable(String),
    /// Operator or method applied to the wrong type.
    TypeMismatch(String),
    /// `.property` that the value does not have.
    UnknownProperty(String, &'static str),
    /// `.method(...)` that the value does not have.
    UnknownMethod(String, &'static str),
    /// Writing to an index outside the list.
    IndexOutOfRange { index: f64, len: usize },
    /// Step budget exhausted — almost always a loop that never ends.
    GasExhausted,
    /// Call stack too deep — almost always runaway recursion.
    CallDepthExceeded,

    /// `return` unwinding (internal).
    Return(Value),
    /// `break` unwinding (internal).
    Break,
    /// `continue` unwinding (internal).
    Continue,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable(name) => write!(f, "'{name}' is not defined"),
            Self::UndefinedFunction(name) => write!(f, "'{name}' is not a function"),
            Self::NotCallable(name) => write!(f, "'{name}' is not a function"),
            Self::TypeMismatch(msg) => write!(f, "{msg}"),
            Self::UnknownProperty(name, ty) => {
                write!(f, "{ty} values have no property '{name}'")
            }
            Self::UnknownMethod(name, ty) => {
                write!(f, "{ty} values have no method '{name}'")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for a list of length {len}")
            }
            Self::GasExhausted => {
                write!(f, "the program ran too long; check for an infinite loop")
            }
            Self::CallDepthExceeded => {
                write!(f, "too many nested function calls; check for runaway recursion")
            }
            Self::Return(_) => write!(f, "return outside of a function"),
            Self::Break => write!(f, "break outside of a loop"),
            Self::Continue => write!(f, "continue outside of a loop"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
