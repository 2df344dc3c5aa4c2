//! Core parser infrastructure: token cursor, diagnostics, recovery.

use codefun_lexer::token::{Token, TokenKind};
use codefun_types::ast::Program;
use codefun_types::{DiagCode, Diagnostic, Diagnostics, SourceFile, Span};

/// The challenge-language parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// On an error it records a diagnostic and resynchronizes at the next
/// statement boundary, so one typo does not hide every later mistake.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source_file: &'src SourceFile,
    diagnostics: Diagnostics,
    /// Current expression nesting depth, capped to protect the stack.
    pub(crate) expr_depth: u32,
}

/// Result of parsing. `program` is `Some` only when no diagnostics were
/// recorded — a partial tree is never handed to the evaluator.
pub struct ParseResult {
    pub program: Option<Program>,
    pub diagnostics: Diagnostics,
}

/// Maximum expression nesting depth.
pub(crate) const MAX_EXPR_DEPTH: u32 = 32;

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            diagnostics: Diagnostics::new(),
            expr_depth: 0,
        }
    }

    /// Parse the whole token stream into a program.
    pub fn parse(mut self) -> ParseResult {
        let start_span = self.current_span();
        let mut stmts = Vec::new();

        while !self.at_end() && !self.diagnostics.at_capacity() {
            // Stray semicolons between statements are harmless.
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
        }

        let span = start_span.merge(self.previous_span());
        let program = if self.diagnostics.is_empty() {
            Some(Program { stmts, span })
        } else {
            None
        };

        ParseResult {
            program,
            diagnostics: self.diagnostics,
        }
    }

    // ── Token cursor ────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream always ends with Eof")
        })
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, consume it and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or record a diagnostic.
    pub(crate) fn expect(
        &mut self,
        kind: &TokenKind,
        code: DiagCode,
        context: &str,
    ) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(
                code,
                format!("expected {} {}, found {}", kind, context, self.peek_kind()),
            );
            None
        }
    }

    /// Consume an identifier or record a diagnostic.
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Option<codefun_types::ast::Ident> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let name = name.clone();
            let token = self.advance();
            Some(codefun_types::ast::Ident::new(name, token.span))
        } else {
            self.error_at_current(
                DiagCode::UNEXPECTED_TOKEN,
                format!("expected identifier {}, found {}", context, self.peek_kind()),
            );
            None
        }
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    pub(crate) fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn error_at_current(&mut self, code: DiagCode, message: impl Into<String>) {
        let span = self.current_span();
        let line = self
            .source_file
            .line(span.start.line)
            .unwrap_or("")
            .to_string();
        self.diagnostics
            .push(Diagnostic::new(code, message, span, line));
    }

    /// Skip tokens until a likely statement boundary.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            if self.eat(&TokenKind::Semicolon) {
                return;
            }
            match self.peek_kind() {
                TokenKind::Function
                | TokenKind::Let
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
