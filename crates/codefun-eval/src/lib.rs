//! Evaluator and sandboxed executor for the CodeFun challenge language.
//!
//! The [`Executor`] is the only entry point the rest of the system uses:
//! it parses submitted source, runs it inside a [`Sandbox`] whose single
//! capability is the `log(...)` primitive, and either surfaces the logged
//! output or calls a named entry point with test inputs. Log output is
//! captured by sink injection rather than by rewriting the submitted
//! source, so nested calls and tricky string literals cannot break it.

mod env;
mod error;
mod evaluator;
mod executor;
mod value;

pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, DEFAULT_GAS_LIMIT, MAX_CALL_DEPTH};
pub use executor::{ExecError, ExecOutcome, Executor, LogSink, Sandbox, EXEC_OK_SENTINEL};
pub use value::Value;
