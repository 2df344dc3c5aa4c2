//! The sandboxed executor — the only way the rest of the system runs
//! submitted code.
//!
//! Output capture works by sink injection: the sandbox owns a [`LogSink`]
//! and the `log(...)` primitive writes into it. Swapping the sink for the
//! duration of one call is how emission-based challenges collect their
//! logged sequence — no source text is ever rewritten.

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::value::Value;
use codefun_lexer::Lexer;
use codefun_parser::Parser;
use codefun_types::ast::Program;
use codefun_types::{Diagnostics, SourceFile};
use std::fmt;

/// What `execute` reports when the program logged nothing.
pub const EXEC_OK_SENTINEL: &str = "Code executed successfully!";

/// Where `log(...)` output goes.
#[derive(Debug, Clone, PartialEq)]
pub enum LogSink {
    /// Accumulate display text, one line per `log` call.
    Display(String),
    /// Record each logged value, in order.
    Capture(Vec<Value>),
}

/// The namespace submitted code runs in. Its single capability is `log`.
#[derive(Debug)]
pub struct Sandbox {
    pub sink: LogSink,
}

impl Sandbox {
    pub fn display() -> Self {
        Self {
            sink: LogSink::Display(String::new()),
        }
    }

    pub fn capture() -> Self {
        Self {
            sink: LogSink::Capture(Vec::new()),
        }
    }

    /// The `log(...)` primitive. Lists serialize to their canonical JSON
    /// form in display mode so `log([1, "Fizz"])` is unambiguous; a
    /// multi-argument call joins its arguments with spaces.
    pub fn log(&mut self, args: Vec<Value>) {
        match &mut self.sink {
            LogSink::Display(out) => {
                let line = args
                    .iter()
                    .map(|v| match v {
                        Value::List(_) => v.json_string(),
                        other => other.display_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push_str(&line);
                out.push('\n');
            }
            LogSink::Capture(values) => {
                if args.len() == 1 {
                    values.push(args.into_iter().next().expect("len checked"));
                } else {
                    let joined = args
                        .iter()
                        .map(Value::display_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    values.push(Value::Str(joined));
                }
            }
        }
    }

    /// Replace the sink, returning the old one.
    pub fn swap_sink(&mut self, sink: LogSink) -> LogSink {
        std::mem::replace(&mut self.sink, sink)
    }
}

/// Failure from the executor boundary: the submission either did not
/// parse or trapped at runtime.
#[derive(Debug, Clone)]
pub enum ExecError {
    Parse(String),
    Runtime(EvalError),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "{msg}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ExecError {}

impl From<EvalError> for ExecError {
    fn from(e: EvalError) -> Self {
        Self::Runtime(e)
    }
}

/// Result of running a submission for its printed output.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// The accumulated log text, or the sentinel when nothing was logged.
    Output(String),
    /// A parse or runtime failure, as a user-facing message.
    Error(String),
}

/// Stateless front door for running submissions. Construction is cheap;
/// every run gets a fresh evaluator, so rapid repeated runs cannot see
/// each other's state.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    gas_limit: u64,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            gas_limit: crate::evaluator::DEFAULT_GAS_LIMIT,
        }
    }

    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self { gas_limit }
    }

    /// Run a submission and report what it logged.
    ///
    /// Never propagates an error: syntax problems and runtime traps both
    /// come back as [`ExecOutcome::Error`] messages.
    pub fn execute(&self, source: &str) -> ExecOutcome {
        let program = match self.parse(source) {
            Ok(program) => program,
            Err(message) => return ExecOutcome::Error(message),
        };

        let mut evaluator = Evaluator::with_gas_limit(Sandbox::display(), self.gas_limit);
        if let Err(e) = evaluator.run_program(&program) {
            return ExecOutcome::Error(e.to_string());
        }

        match evaluator.sandbox.sink {
            LogSink::Display(out) if out.is_empty() => {
                ExecOutcome::Output(EXEC_OK_SENTINEL.to_string())
            }
            LogSink::Display(out) => ExecOutcome::Output(out),
            LogSink::Capture(_) => unreachable!("execute always installs a display sink"),
        }
    }

    /// Run the submission's top level, then call the named entry point
    /// with `args` and return its value. Top-level log output is
    /// discarded; errors propagate to the caller.
    pub fn compile_and_call(
        &self,
        source: &str,
        entry: &str,
        args: &[Value],
    ) -> Result<Value, ExecError> {
        let mut evaluator = self.prepare(source)?;
        Ok(evaluator.call_by_name(entry, args.to_vec())?)
    }

    /// Like [`Executor::compile_and_call`], but with a capture sink
    /// installed for the duration of the call: returns the ordered
    /// sequence of values the entry point logged.
    pub fn call_capturing_logs(
        &self,
        source: &str,
        entry: &str,
        args: &[Value],
    ) -> Result<Vec<Value>, ExecError> {
        let mut evaluator = self.prepare(source)?;

        let previous = evaluator.sandbox.swap_sink(LogSink::Capture(Vec::new()));
        let call_result = evaluator.call_by_name(entry, args.to_vec());
        let captured = evaluator.sandbox.swap_sink(previous);

        call_result?;
        match captured {
            LogSink::Capture(values) => Ok(values),
            LogSink::Display(_) => unreachable!("capture sink was just installed"),
        }
    }

    /// Parse and run the top level with a display sink, leaving the
    /// evaluator ready for entry-point calls.
    fn prepare(&self, source: &str) -> Result<Evaluator, ExecError> {
        let program = self.parse(source).map_err(ExecError::Parse)?;
        let mut evaluator = Evaluator::with_gas_limit(Sandbox::display(), self.gas_limit);
        evaluator.run_program(&program)?;
        Ok(evaluator)
    }

    fn parse(&self, source: &str) -> Result<Program, String> {
        let sf = SourceFile::new("submission.fun", source);
        let lexed = Lexer::new(&sf).lex();
        if !lexed.diagnostics.is_empty() {
            return Err(syntax_message(&lexed.diagnostics));
        }
        let parsed = Parser::new(lexed.tokens, &sf).parse();
        match parsed.program {
            Some(program) if parsed.diagnostics.is_empty() => Ok(program),
            _ => Err(syntax_message(&parsed.diagnostics)),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

fn syntax_message(diagnostics: &Diagnostics) -> String {
    diagnostics
        .first_message()
        .unwrap_or("could not parse the submitted code")
        .to_string()
}
