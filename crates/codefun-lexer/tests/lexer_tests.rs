//! Integration tests for the challenge-language lexer.

use codefun_lexer::{Lexer, TokenKind};
use codefun_types::{DiagCode, SourceFile, MAX_DIAGNOSTICS};

/// Lex source, asserting no diagnostics, and return the token kinds
/// without the trailing Eof.
fn lex(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.fun", source);
    let result = Lexer::new(&sf).lex();
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics.items
    );
    let mut kinds: Vec<TokenKind> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds.pop(), Some(TokenKind::Eof), "stream must end with Eof");
    kinds
}

/// Lex source expected to produce diagnostics; returns their codes.
fn lex_errors(source: &str) -> Vec<DiagCode> {
    let sf = SourceFile::new("test.fun", source);
    let result = Lexer::new(&sf).lex();
    result.diagnostics.items.iter().map(|d| d.code).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        lex("function isEven let x"),
        vec![TokenKind::Function, ident("isEven"), TokenKind::Let, ident("x")]
    );
}

#[test]
fn keyword_prefix_is_identifier() {
    assert_eq!(lex("letter iffy"), vec![ident("letter"), ident("iffy")]);
}

#[test]
fn numbers() {
    assert_eq!(
        lex("0 42 3.14"),
        vec![
            TokenKind::Number(0.0),
            TokenKind::Number(42.0),
            TokenKind::Number(3.14)
        ]
    );
}

#[test]
fn negative_number_is_minus_then_number() {
    assert_eq!(
        lex("-4"),
        vec![TokenKind::Minus, TokenKind::Number(4.0)]
    );
}

#[test]
fn double_and_single_quoted_strings() {
    assert_eq!(
        lex(r#""hello" 'world'"#),
        vec![
            TokenKind::Str("hello".to_string()),
            TokenKind::Str("world".to_string())
        ]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        lex(r#""a\nb\t\"c\"""#),
        vec![TokenKind::Str("a\nb\t\"c\"".to_string())]
    );
}

#[test]
fn string_with_unicode() {
    assert_eq!(
        lex(r#""Great job! 🎉""#),
        vec![TokenKind::Str("Great job! 🎉".to_string())]
    );
}

#[test]
fn multi_char_operators() {
    assert_eq!(
        lex("=== !== == != <= >= && || ++ -- += -="),
        vec![
            TokenKind::EqEqEq,
            TokenKind::BangEqEq,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::PlusAssign,
            TokenKind::MinusAssign,
        ]
    );
}

#[test]
fn comments_are_stripped() {
    assert_eq!(
        lex("let x = 1 // the answer\nlet y = 2"),
        vec![
            TokenKind::Let,
            ident("x"),
            TokenKind::Assign,
            TokenKind::Number(1.0),
            TokenKind::Let,
            ident("y"),
            TokenKind::Assign,
            TokenKind::Number(2.0),
        ]
    );
}

#[test]
fn fizzbuzz_snippet_lexes() {
    let kinds = lex(
        r#"
function fizzBuzz(n) {
  for (let i = 1; i <= n; i++) {
    if (i % 15 === 0) { log("FizzBuzz") }
  }
}
"#,
    );
    assert!(kinds.contains(&TokenKind::Function));
    assert!(kinds.contains(&TokenKind::PlusPlus));
    assert!(kinds.contains(&TokenKind::EqEqEq));
    assert!(kinds.contains(&TokenKind::Str("FizzBuzz".to_string())));
}

#[test]
fn spans_track_lines() {
    let sf = SourceFile::new("test.fun", "let a\nlet b");
    let result = Lexer::new(&sf).lex();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.tokens[0].span.start.line, 1);
    assert_eq!(result.tokens[2].span.start.line, 2);
    assert_eq!(result.tokens[2].span.start.col, 1);
}

#[test]
fn spans_count_characters_not_bytes() {
    // "é" is two bytes but one column wide.
    let sf = SourceFile::new("test.fun", "\"é\" x");
    let result = Lexer::new(&sf).lex();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.tokens[0].kind, TokenKind::Str("é".to_string()));
    assert_eq!(result.tokens[0].span.end.col, 4);
    assert_eq!(result.tokens[1].span.start.col, 5);
}

#[test]
fn unterminated_string() {
    assert_eq!(
        lex_errors("let s = \"oops"),
        vec![DiagCode::UNTERMINATED_STRING]
    );
}

#[test]
fn unknown_escape() {
    assert_eq!(lex_errors(r#""bad \q escape""#), vec![DiagCode::BAD_ESCAPE]);
}

#[test]
fn stray_character_recovers() {
    let sf = SourceFile::new("test.fun", "let x @ = 1");
    let result = Lexer::new(&sf).lex();
    assert_eq!(
        result.diagnostics.items[0].code,
        DiagCode::STRAY_CHARACTER
    );
    // Lexing continues past the stray character.
    let kinds: Vec<_> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&TokenKind::Assign));
    assert!(kinds.contains(&TokenKind::Number(1.0)));
}

#[test]
fn single_ampersand_reports() {
    assert_eq!(lex_errors("a & b"), vec![DiagCode::STRAY_CHARACTER]);
}

#[test]
fn diagnostics_are_capped() {
    let garbage = "@".repeat(MAX_DIAGNOSTICS * 3);
    let sf = SourceFile::new("test.fun", garbage);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.diagnostics.items.len(), MAX_DIAGNOSTICS);
    // The stream still terminates.
    assert_eq!(result.tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
}

#[test]
fn empty_source_is_just_eof() {
    let sf = SourceFile::new("test.fun", "");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
}
