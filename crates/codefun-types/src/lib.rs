//! Shared types for the CodeFun challenge language.
//!
//! Defines source spans, the source-file wrapper used for diagnostics,
//! the diagnostic types themselves, and the AST shared by the lexer,
//! parser, and evaluator.

mod diagnostics;
mod span;
pub mod ast;

pub use diagnostics::{DiagCode, Diagnostic, Diagnostics, Stage, MAX_DIAGNOSTICS};
pub use span::{Pos, SourceFile, Span};
