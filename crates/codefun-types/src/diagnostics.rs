use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on collected diagnostics. Lexer and parser both stop
/// recording past this point so a garbage submission cannot flood the
/// output pane.
pub const MAX_DIAGNOSTICS: usize = 20;

/// Which pipeline stage produced a diagnostic, derived from its code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lex,
    Parse,
}

/// Numeric diagnostic code. E1xx are lexical, E2xx syntactic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiagCode(pub u16);

impl DiagCode {
    // ── Lexical (E100–E199) ──
    pub const STRAY_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const BAD_ESCAPE: Self = Self(102);
    pub const MALFORMED_NUMBER: Self = Self(103);

    // ── Syntactic (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const EXPECTED_EXPRESSION: Self = Self(201);
    pub const UNCLOSED_DELIMITER: Self = Self(202);
    pub const INVALID_ASSIGNMENT_TARGET: Self = Self(203);
    pub const NESTING_TOO_DEEP: Self = Self(204);

    pub fn stage(self) -> Stage {
        if self.0 < 200 {
            Stage::Lex
        } else {
            Stage::Parse
        }
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// One structured diagnostic. Serialized across the wasm boundary; the
/// page renders these, it never parses free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagCode,
    pub stage: Stage,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, quoted for context.
    pub source_line: String,
}

impl Diagnostic {
    pub fn new(
        code: DiagCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            code,
            stage: code.stage(),
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span, self.code, self.message)
    }
}

/// Capped diagnostic collection shared by lexer and parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
    /// Count of diagnostics that were dropped once `items` was full.
    pub dropped: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, dropping it (but counting the drop) once the
    /// cap is reached.
    pub fn push(&mut self, diag: Diagnostic) {
        if self.items.len() < MAX_DIAGNOSTICS {
            self.items.push(diag);
        } else {
            self.dropped += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn at_capacity(&self) -> bool {
        self.items.len() >= MAX_DIAGNOSTICS
    }

    /// Message of the first diagnostic, for single-line error surfaces.
    pub fn first_message(&self) -> Option<&str> {
        self.items.first().map(|d| d.message.as_str())
    }
}
