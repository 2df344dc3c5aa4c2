//! Runtime values.

use codefun_types::ast::FnDecl;
use std::fmt;
use std::rc::Rc;

/// A runtime value of the challenge language.
///
/// `Null` doubles as JS `undefined`: a function with no `return` produces
/// it, as does an out-of-range index.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Null,
    /// A user-defined function, shared by reference.
    Function(Rc<FnDecl>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Null => "null",
            Value::Function(_) => "function",
        }
    }

    /// JS-style truthiness: `false`, `0`, `NaN`, `""`, and `null` are
    /// falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Null => false,
            Value::List(_) | Value::Function(_) => true,
        }
    }

    /// The textual form used for string concatenation, `log` output of
    /// scalars, and element-wise sequence comparison. Mirrors JS
    /// `String(v)`: integral numbers print without a decimal point and
    /// list elements join with commas.
    pub fn display_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => s.clone(),
            Value::Null => "null".to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::display_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(f) => format!("function {}", f.name.name),
        }
    }

    /// Canonical serialized form for structured values, used when `log`
    /// receives a list: `[1,2,"Fizz"]` rather than `1,2,Fizz`.
    pub fn json_string(&self) -> String {
        match self {
            Value::Str(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}")),
            Value::List(items) => {
                let inner = items
                    .iter()
                    .map(Value::json_string)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("[{inner}]")
            }
            Value::Null => "null".to_string(),
            other => other.display_string(),
        }
    }
}

/// Strict equality. Values of different types are never equal; `NaN`
/// compares unequal to itself; functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Format a number the way JS `String(n)` does for the values the
/// challenges produce: no trailing `.0`, `-0` collapses to `0`.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{n}")
}
