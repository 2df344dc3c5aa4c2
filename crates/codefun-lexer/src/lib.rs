//! Lexer for the CodeFun challenge language.
//!
//! Converts submitted source text into a token stream, collecting
//! diagnostics instead of failing on the first bad character.

mod lexer;
pub mod token;

pub use lexer::{LexResult, Lexer};
pub use token::{Token, TokenKind};
