//! Integration tests for the challenge-language parser.

use codefun_lexer::Lexer;
use codefun_parser::Parser;
use codefun_types::ast::*;
use codefun_types::{DiagCode, SourceFile};

/// Parse source, asserting success.
fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.fun", source);
    let lex = Lexer::new(&sf).lex();
    assert!(
        lex.diagnostics.is_empty(),
        "lex diagnostics: {:?}",
        lex.diagnostics.items
    );
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(
        result.diagnostics.is_empty(),
        "parse diagnostics: {:?}",
        result.diagnostics.items
    );
    result.program.expect("program after clean parse")
}

/// Parse source expected to fail; returns the diagnostic codes.
fn parse_errors(source: &str) -> Vec<DiagCode> {
    let sf = SourceFile::new("test.fun", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(
        result.program.is_none(),
        "expected parse failure for {source:?}"
    );
    result.diagnostics.items.iter().map(|d| d.code).collect()
}

#[test]
fn function_declaration() {
    let prog = parse("function isEven(n) { return n % 2 === 0 }");
    assert_eq!(prog.stmts.len(), 1);
    let Stmt::Function(f) = &prog.stmts[0] else {
        panic!("expected function");
    };
    assert_eq!(f.name.name, "isEven");
    assert_eq!(f.params.len(), 1);
    assert_eq!(f.params[0].name, "n");
    assert_eq!(f.body.stmts.len(), 1);
}

#[test]
fn let_binding_with_optional_semicolon() {
    let with = parse("let x = 1;");
    let without = parse("let x = 1");
    assert_eq!(with.stmts.len(), 1);
    assert_eq!(without.stmts.len(), 1);
}

#[test]
fn if_else_if_chain() {
    let prog = parse(
        r#"
if (n % 15 === 0) { log("FizzBuzz") }
else if (n % 3 === 0) { log("Fizz") }
else if (n % 5 === 0) { log("Buzz") }
else { log(n) }
"#,
    );
    let Stmt::If(if_stmt) = &prog.stmts[0] else {
        panic!("expected if");
    };
    let Some(ElseBranch::If(second)) = &if_stmt.else_branch else {
        panic!("expected else-if");
    };
    let Some(ElseBranch::If(third)) = &second.else_branch else {
        panic!("expected second else-if");
    };
    assert!(matches!(third.else_branch, Some(ElseBranch::Block(_))));
}

#[test]
fn c_style_for_loop() {
    let prog = parse("for (let i = 1; i <= n; i++) { log(i) }");
    let Stmt::For(for_stmt) = &prog.stmts[0] else {
        panic!("expected for");
    };
    assert!(matches!(for_stmt.init.as_deref(), Some(Stmt::Let(_))));
    assert!(for_stmt.cond.is_some());
    // i++ desugars to i += 1
    let Some(Stmt::Assign(step)) = for_stmt.step.as_deref() else {
        panic!("expected step assignment");
    };
    assert_eq!(step.op, AssignOp::Add);
    assert_eq!(step.value.kind, ExprKind::Number(1.0));
}

#[test]
fn empty_for_header() {
    let prog = parse("for (;;) { break }");
    let Stmt::For(for_stmt) = &prog.stmts[0] else {
        panic!("expected for");
    };
    assert!(for_stmt.init.is_none());
    assert!(for_stmt.cond.is_none());
    assert!(for_stmt.step.is_none());
    assert!(matches!(for_stmt.body.stmts[0], Stmt::Break(_)));
}

#[test]
fn compound_assignment() {
    let prog = parse("cleaned += ch");
    let Stmt::Assign(assign) = &prog.stmts[0] else {
        panic!("expected assignment");
    };
    assert_eq!(assign.op, AssignOp::Add);
    assert!(matches!(&assign.target, AssignTarget::Name(n) if n.name == "cleaned"));
}

#[test]
fn index_assignment() {
    let prog = parse("xs[0] = 5");
    let Stmt::Assign(assign) = &prog.stmts[0] else {
        panic!("expected assignment");
    };
    assert!(matches!(assign.target, AssignTarget::Index { .. }));
}

#[test]
fn precedence_mul_before_add() {
    let prog = parse("let x = 1 + 2 * 3");
    let Stmt::Let(let_stmt) = &prog.stmts[0] else {
        panic!("expected let");
    };
    let ExprKind::Binary { op: BinOp::Add, right, .. } = &let_stmt.value.kind else {
        panic!("expected + at the top");
    };
    assert!(matches!(
        right.kind,
        ExprKind::Binary { op: BinOp::Mul, .. }
    ));
}

#[test]
fn precedence_comparison_before_and() {
    let prog = parse("let ok = a < b && c >= d");
    let Stmt::Let(let_stmt) = &prog.stmts[0] else {
        panic!("expected let");
    };
    assert!(matches!(
        let_stmt.value.kind,
        ExprKind::Binary { op: BinOp::And, .. }
    ));
}

#[test]
fn method_chain_and_index() {
    let prog = parse(r#"let c = s.toLowerCase().charAt(0)"#);
    let Stmt::Let(let_stmt) = &prog.stmts[0] else {
        panic!("expected let");
    };
    let ExprKind::Method { object, method, args } = &let_stmt.value.kind else {
        panic!("expected outer method call");
    };
    assert_eq!(method.name, "charAt");
    assert_eq!(args.len(), 1);
    assert!(matches!(object.kind, ExprKind::Method { .. }));
}

#[test]
fn length_property() {
    let prog = parse("let n = s.length");
    let Stmt::Let(let_stmt) = &prog.stmts[0] else {
        panic!("expected let");
    };
    let ExprKind::Property { name, .. } = &let_stmt.value.kind else {
        panic!("expected property access");
    };
    assert_eq!(name.name, "length");
}

#[test]
fn list_literal() {
    let prog = parse(r#"let xs = [1, "Fizz", true]"#);
    let Stmt::Let(let_stmt) = &prog.stmts[0] else {
        panic!("expected let");
    };
    let ExprKind::List(elems) = &let_stmt.value.kind else {
        panic!("expected list literal");
    };
    assert_eq!(elems.len(), 3);
}

#[test]
fn call_by_name() {
    let prog = parse("log(1, 2)");
    let Stmt::Expr(stmt) = &prog.stmts[0] else {
        panic!("expected expression statement");
    };
    let ExprKind::Call { name, args } = &stmt.expr.kind else {
        panic!("expected call");
    };
    assert_eq!(name.name, "log");
    assert_eq!(args.len(), 2);
}

#[test]
fn return_without_value() {
    let prog = parse("function f() { return }");
    let Stmt::Function(f) = &prog.stmts[0] else {
        panic!("expected function");
    };
    let Stmt::Return(ret) = &f.body.stmts[0] else {
        panic!("expected return");
    };
    assert!(ret.value.is_none());
}

#[test]
fn missing_paren_reports_unclosed() {
    let codes = parse_errors("let x = (1 + 2");
    assert!(codes.contains(&DiagCode::UNCLOSED_DELIMITER));
}

#[test]
fn missing_brace_reports_unclosed() {
    let codes = parse_errors("function f() { return 1");
    assert!(codes.contains(&DiagCode::UNCLOSED_DELIMITER));
}

#[test]
fn garbage_reports_expected_expression() {
    let codes = parse_errors("let x = *");
    assert!(codes.contains(&DiagCode::EXPECTED_EXPRESSION));
}

#[test]
fn invalid_assignment_target() {
    let codes = parse_errors("1 + 2 = 3");
    assert!(codes.contains(&DiagCode::INVALID_ASSIGNMENT_TARGET));
}

#[test]
fn deep_nesting_is_rejected() {
    let src = format!("let x = {}1{}", "(".repeat(60), ")".repeat(60));
    let codes = parse_errors(&src);
    assert!(codes.contains(&DiagCode::NESTING_TOO_DEEP));
}

#[test]
fn recovery_reports_multiple_errors() {
    let codes = parse_errors("let x = *\nlet y = *");
    assert!(codes.len() >= 2, "expected two diagnostics, got {codes:?}");
}

#[test]
fn full_palindrome_solution_parses() {
    let prog = parse(
        r#"
function isPalindrome(s) {
  let lower = s.toLowerCase();
  let cleaned = "";
  for (let i = 0; i < lower.length; i++) {
    let ch = lower[i];
    if ((ch >= "a" && ch <= "z") || (ch >= "0" && ch <= "9")) {
      cleaned += ch;
    }
  }
  let reversed = "";
  for (let i = cleaned.length - 1; i >= 0; i--) {
    reversed += cleaned[i];
  }
  return cleaned === reversed;
}
"#,
    );
    assert_eq!(prog.stmts.len(), 1);
}
