//! Recursive-descent parser for the CodeFun challenge language.
//!
//! Consumes the lexer's token stream and builds a [`codefun_types::ast::Program`],
//! collecting diagnostics and recovering at statement boundaries.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser};
