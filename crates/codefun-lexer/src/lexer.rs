//! Core lexer — converts submitted source text into a token stream.
//!
//! - Single- and double-quoted strings with `\n \t \\ \" \'` escapes
//! - `//` comments stripped to end of line
//! - Multi-character operators (`===`, `!==`, `&&`, `++`, ...)
//! - Error recovery: collects up to [`MAX_DIAGNOSTICS`] diagnostics
//!   instead of stopping at the first bad character

use codefun_types::{DiagCode, Diagnostic, Diagnostics, Pos, SourceFile, Span, MAX_DIAGNOSTICS};

use crate::token::{Token, TokenKind};

/// The challenge-language lexer.
pub struct Lexer<'src> {
    /// Full source as bytes. String contents are re-sliced as UTF-8.
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset.
    pos: usize,
    /// Current 1-based line.
    line: u32,
    /// Current 1-based column.
    col: u32,
    diagnostics: Diagnostics,
}

/// Result of lexing: tokens plus any diagnostics collected.
pub struct LexResult {
    /// The token stream, always terminated by [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Lex the whole source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.diagnostics.at_capacity() {
                break;
            }
            let token = self.scan_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, Span::point(self.line, self.col)));
        }

        LexResult {
            tokens,
            diagnostics: self.diagnostics,
        }
    }

    // ── Cursor helpers ──────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if (ch & 0xC0) != 0x80 {
            // Columns count characters, not bytes: UTF-8 continuation
            // bytes stay in the column of their lead byte.
            self.col += 1;
        }
        Some(ch)
    }

    fn here(&self) -> Pos {
        Pos::new(self.line, self.col)
    }

    fn error(&mut self, code: DiagCode, message: impl Into<String>, span: Span) {
        let line = self
            .source_file
            .line(span.start.line)
            .unwrap_or("")
            .to_string();
        self.diagnostics
            .push(Diagnostic::new(code, message, span, line));
        debug_assert!(self.diagnostics.items.len() <= MAX_DIAGNOSTICS);
    }

    // ── Scanning ────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        // Loop rather than recurse so a run of stray characters cannot
        // grow the stack.
        loop {
            self.skip_whitespace_and_comments();

            let start = self.here();
            let Some(ch) = self.peek() else {
                return Token::new(TokenKind::Eof, Span::new(start, start));
            };

            let token = match ch {
                b'"' | b'\'' => Some(self.scan_string()),
                b'0'..=b'9' => Some(self.scan_number()),
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => Some(self.scan_word()),
                _ => self.scan_operator(),
            };
            if let Some(token) = token {
                return token;
            }
            if self.diagnostics.at_capacity() {
                return Token::new(TokenKind::Eof, Span::new(start, self.here()));
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        let start = self.here();
        let quote = self.advance().unwrap_or(b'"');
        let mut text = String::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = Span::new(start, self.here());
                    self.error(
                        DiagCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    return Token::new(TokenKind::Str(text), span);
                }
                Some(b'\\') => {
                    self.advance();
                    let escape_pos = self.here();
                    match self.advance() {
                        Some(b'n') => text.push('\n'),
                        Some(b't') => text.push('\t'),
                        Some(b'\\') => text.push('\\'),
                        Some(b'"') => text.push('"'),
                        Some(b'\'') => text.push('\''),
                        other => {
                            let span = Span::new(escape_pos, self.here());
                            let what = other
                                .map(|b| format!("'\\{}'", b as char))
                                .unwrap_or_else(|| "end of input".to_string());
                            self.error(
                                DiagCode::BAD_ESCAPE,
                                format!("unknown escape sequence {what}"),
                                span,
                            );
                        }
                    }
                }
                Some(b) if b == quote => {
                    self.advance();
                    let span = Span::new(start, self.here());
                    return Token::new(TokenKind::Str(text), span);
                }
                Some(_) => {
                    // Consume one full UTF-8 character so multi-byte text
                    // (the site is used worldwide) survives intact.
                    let ch_start = self.pos;
                    self.advance();
                    while self
                        .peek()
                        .map(|b| (b & 0xC0) == 0x80)
                        .unwrap_or(false)
                    {
                        self.advance();
                    }
                    if let Ok(s) = std::str::from_utf8(&self.source[ch_start..self.pos]) {
                        text.push_str(s);
                    }
                }
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let start = self.here();
        let digits_start = self.pos;

        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance(); // '.'
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }

        let text = std::str::from_utf8(&self.source[digits_start..self.pos]).unwrap_or("0");
        let span = Span::new(start, self.here());
        match text.parse::<f64>() {
            Ok(n) => Token::new(TokenKind::Number(n), span),
            Err(_) => {
                self.error(
                    DiagCode::MALFORMED_NUMBER,
                    format!("malformed number literal '{text}'"),
                    span,
                );
                Token::new(TokenKind::Number(0.0), span)
            }
        }
    }

    fn scan_word(&mut self) -> Token {
        let start = self.here();
        let word_start = self.pos;

        while matches!(
            self.peek(),
            Some(b'A'..=b'Z') | Some(b'a'..=b'z') | Some(b'0'..=b'9') | Some(b'_')
        ) {
            self.advance();
        }

        let word = std::str::from_utf8(&self.source[word_start..self.pos]).unwrap_or("");
        let span = Span::new(start, self.here());
        match TokenKind::keyword(word) {
            Some(kind) => Token::new(kind, span),
            None => Token::new(TokenKind::Identifier(word.to_string()), span),
        }
    }

    /// Scan an operator or punctuation token. Returns `None` after
    /// recording a diagnostic for a character with no token.
    fn scan_operator(&mut self) -> Option<Token> {
        let start = self.here();
        let ch = self.advance()?;

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'.' => TokenKind::Dot,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'+' => match self.peek() {
                Some(b'+') => {
                    self.advance();
                    TokenKind::PlusPlus
                }
                Some(b'=') => {
                    self.advance();
                    TokenKind::PlusAssign
                }
                _ => TokenKind::Plus,
            },
            b'-' => match self.peek() {
                Some(b'-') => {
                    self.advance();
                    TokenKind::MinusMinus
                }
                Some(b'=') => {
                    self.advance();
                    TokenKind::MinusAssign
                }
                _ => TokenKind::Minus,
            },
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    TokenKind::AmpAmp
                } else {
                    let span = Span::new(start, self.here());
                    self.error(
                        DiagCode::STRAY_CHARACTER,
                        "single '&' is not an operator; use '&&'",
                        span,
                    );
                    return None;
                }
            }
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    TokenKind::PipePipe
                } else {
                    let span = Span::new(start, self.here());
                    self.error(
                        DiagCode::STRAY_CHARACTER,
                        "single '|' is not an operator; use '||'",
                        span,
                    );
                    return None;
                }
            }
            other => {
                let span = Span::new(start, self.here());
                self.error(
                    DiagCode::STRAY_CHARACTER,
                    format!("unexpected character '{}'", other as char),
                    span,
                );
                return None;
            }
        };

        Some(Token::new(kind, Span::new(start, self.here())))
    }
}
