//! Integration tests for the tree-walking evaluator.
//!
//! Covers:
//! - literals, arithmetic, comparison, logic
//! - strings: methods, indexing, concatenation
//! - lists: methods, indexing, indexed assignment
//! - control flow: if/else chains, while, for, break/continue
//! - functions: hoisting, recursion, argument padding
//! - gas metering and call-depth limits

use codefun_eval::{EvalError, Evaluator, Executor, Sandbox, Value};
use codefun_lexer::Lexer;
use codefun_parser::Parser;
use codefun_types::SourceFile;

// ══════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════

/// Run a program and return the value of the global `result` variable.
fn eval_result(source: &str) -> Value {
    let sf = SourceFile::new("test.fun", source);
    let lexed = Lexer::new(&sf).lex();
    assert!(lexed.diagnostics.is_empty(), "lex: {:?}", lexed.diagnostics.items);
    let parsed = Parser::new(lexed.tokens, &sf).parse();
    assert!(parsed.diagnostics.is_empty(), "parse: {:?}", parsed.diagnostics.items);
    let program = parsed.program.expect("program");

    let mut evaluator = Evaluator::new(Sandbox::display());
    evaluator.run_program(&program).expect("run_program");
    evaluator
        .env
        .get("result")
        .cloned()
        .expect("program must define 'result'")
}

/// Run a program expected to trap; returns the error.
fn eval_error(source: &str) -> EvalError {
    let sf = SourceFile::new("test.fun", source);
    let lexed = Lexer::new(&sf).lex();
    let parsed = Parser::new(lexed.tokens, &sf).parse();
    let program = parsed.program.expect("program should parse");

    let mut evaluator = Evaluator::new(Sandbox::display());
    evaluator
        .run_program(&program)
        .expect_err("expected a runtime error")
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn s(v: &str) -> Value {
    Value::Str(v.to_string())
}

fn b(v: bool) -> Value {
    Value::Bool(v)
}

// ══════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn arithmetic() {
    assert_eq!(eval_result("let result = 1 + 2 * 3"), num(7.0));
    assert_eq!(eval_result("let result = (1 + 2) * 3"), num(9.0));
    assert_eq!(eval_result("let result = 10 / 4"), num(2.5));
    assert_eq!(eval_result("let result = -7 % 3"), num(-1.0));
}

#[test]
fn string_concatenation_coerces() {
    assert_eq!(eval_result(r#"let result = "n = " + 4"#), s("n = 4"));
    assert_eq!(eval_result(r#"let result = 4 + "!""#), s("4!"));
    assert_eq!(eval_result(r#"let result = "is " + true"#), s("is true"));
}

#[test]
fn equality_is_strict() {
    assert_eq!(eval_result(r#"let result = 4 === 4"#), b(true));
    assert_eq!(eval_result(r#"let result = 4 == "4""#), b(false));
    assert_eq!(eval_result(r#"let result = 4 !== "4""#), b(true));
    assert_eq!(eval_result(r#"let result = null == null"#), b(true));
}

#[test]
fn comparison_on_strings_is_lexicographic() {
    assert_eq!(eval_result(r#"let result = "a" < "b""#), b(true));
    assert_eq!(eval_result(r#"let result = "z" <= "a""#), b(false));
    assert_eq!(eval_result(r#"let result = "9" <= "z""#), b(true));
}

#[test]
fn logic_short_circuits_and_yields_operands() {
    assert_eq!(eval_result("let result = false && missing()"), b(false));
    assert_eq!(eval_result("let result = true || missing()"), b(true));
    assert_eq!(eval_result(r#"let result = "" || "fallback""#), s("fallback"));
    assert_eq!(eval_result("let result = 1 && 2"), num(2.0));
}

#[test]
fn unary_operators() {
    assert_eq!(eval_result("let result = -(3 + 4)"), num(-7.0));
    assert_eq!(eval_result("let result = !0"), b(true));
    assert_eq!(eval_result(r#"let result = !"text""#), b(false));
}

#[test]
fn division_follows_ieee() {
    assert_eq!(eval_result("let result = 1 / 0"), num(f64::INFINITY));
    let nan = eval_result("let result = 0 / 0");
    assert!(matches!(nan, Value::Number(n) if n.is_nan()));
}

// ══════════════════════════════════════════════════════════════════════════
// Strings
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn string_methods() {
    assert_eq!(eval_result(r#"let result = "RaceCar".toLowerCase()"#), s("racecar"));
    assert_eq!(eval_result(r#"let result = "fun".toUpperCase()"#), s("FUN"));
    assert_eq!(eval_result(r#"let result = "  hi  ".trim()"#), s("hi"));
    assert_eq!(eval_result(r#"let result = "hello".charAt(1)"#), s("e"));
    assert_eq!(eval_result(r#"let result = "hello".charAt(99)"#), s(""));
    assert_eq!(eval_result(r#"let result = "hello".includes("ell")"#), b(true));
}

#[test]
fn string_split() {
    assert_eq!(
        eval_result(r#"let result = "a,b".split(",")"#),
        Value::List(vec![s("a"), s("b")])
    );
    assert_eq!(
        eval_result(r#"let result = "ab".split("")"#),
        Value::List(vec![s("a"), s("b")])
    );
}

#[test]
fn string_length_and_indexing() {
    assert_eq!(eval_result(r#"let result = "hello".length"#), num(5.0));
    assert_eq!(eval_result(r#"let result = "hello"[1]"#), s("e"));
    assert_eq!(eval_result(r#"let result = "hello"[99]"#), Value::Null);
}

// ══════════════════════════════════════════════════════════════════════════
// Lists
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn list_push_writes_back_and_returns_length() {
    assert_eq!(
        eval_result("let xs = [1]\nlet result = xs.push(2)"),
        num(2.0)
    );
    assert_eq!(
        eval_result("let xs = [1]\nxs.push(2)\nlet result = xs"),
        Value::List(vec![num(1.0), num(2.0)])
    );
}

#[test]
fn list_reverse_and_join() {
    assert_eq!(
        eval_result("let xs = [1, 2, 3]\nxs.reverse()\nlet result = xs"),
        Value::List(vec![num(3.0), num(2.0), num(1.0)])
    );
    assert_eq!(
        eval_result(r#"let result = [1, "Fizz", 3].join(", ")"#),
        s("1, Fizz, 3")
    );
}

#[test]
fn list_indexing_and_assignment() {
    assert_eq!(eval_result("let xs = [1, 2]\nlet result = xs[1]"), num(2.0));
    assert_eq!(eval_result("let xs = [1, 2]\nlet result = xs[5]"), Value::Null);
    assert_eq!(
        eval_result("let xs = [1, 2]\nxs[0] = 9\nlet result = xs[0]"),
        num(9.0)
    );
}

#[test]
fn list_index_assignment_out_of_range_traps() {
    let e = eval_error("let xs = [1]\nxs[3] = 0");
    assert!(matches!(e, EvalError::IndexOutOfRange { .. }));
}

// ══════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn if_else_chain() {
    let source = r#"
let n = 15
let result = ""
if (n % 15 === 0) { result = "FizzBuzz" }
else if (n % 3 === 0) { result = "Fizz" }
else if (n % 5 === 0) { result = "Buzz" }
else { result = "" + n }
"#;
    assert_eq!(eval_result(source), s("FizzBuzz"));
}

#[test]
fn while_loop_with_break_and_continue() {
    let source = r#"
let total = 0
let i = 0
while (true) {
  i++
  if (i > 10) { break }
  if (i % 2 === 0) { continue }
  total += i
}
let result = total
"#;
    // 1 + 3 + 5 + 7 + 9
    assert_eq!(eval_result(source), num(25.0));
}

#[test]
fn for_loop_counts() {
    let source = r#"
let total = 0
for (let i = 1; i <= 5; i++) { total += i }
let result = total
"#;
    assert_eq!(eval_result(source), num(15.0));
}

#[test]
fn for_loop_variable_is_scoped_to_loop() {
    let e = eval_error("for (let i = 0; i < 3; i++) { }\nlet result = i");
    assert!(matches!(e, EvalError::UndefinedVariable(name) if name == "i"));
}

#[test]
fn block_scoping() {
    let source = r#"
let x = 1
{
  let x = 2
}
let result = x
"#;
    assert_eq!(eval_result(source), num(1.0));
}

// ══════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn function_call_and_return() {
    let source = r#"
function double(n) { return n * 2 }
let result = double(21)
"#;
    assert_eq!(eval_result(source), num(42.0));
}

#[test]
fn functions_hoist_above_use() {
    let source = r#"
let result = double(4)
function double(n) { return n * 2 }
"#;
    assert_eq!(eval_result(source), num(8.0));
}

#[test]
fn function_without_return_yields_null() {
    let source = r#"
function noop() { let x = 1 }
let result = noop()
"#;
    assert_eq!(eval_result(source), Value::Null);
}

#[test]
fn missing_arguments_become_null() {
    let source = r#"
function firstArg(a, b) { return b }
let result = firstArg(1)
"#;
    assert_eq!(eval_result(source), Value::Null);
}

#[test]
fn recursion() {
    let source = r#"
function fact(n) {
  if (n <= 1) { return 1 }
  return n * fact(n - 1)
}
let result = fact(6)
"#;
    assert_eq!(eval_result(source), num(720.0));
}

#[test]
fn function_locals_do_not_leak_between_calls() {
    let source = r#"
function inner() { return secret }
function outer() {
  let secret = 1
  return inner()
}
let result = 0
"#;
    let sf = SourceFile::new("test.fun", source);
    let lexed = Lexer::new(&sf).lex();
    let parsed = Parser::new(lexed.tokens, &sf).parse();
    let program = parsed.program.expect("program");
    let mut evaluator = Evaluator::new(Sandbox::display());
    evaluator.run_program(&program).expect("top level runs");
    let e = evaluator
        .call_by_name("outer", vec![])
        .expect_err("inner must not see outer's locals");
    assert!(matches!(e, EvalError::UndefinedVariable(name) if name == "secret"));
}

#[test]
fn undefined_function_call() {
    let e = eval_error("let result = nothing()");
    assert!(matches!(e, EvalError::UndefinedFunction(ref name) if name == "nothing"));
    assert_eq!(e.to_string(), "'nothing' is not a function");
}

#[test]
fn calling_a_non_function_value() {
    let e = eval_error("let f = 3\nlet result = f()");
    assert!(matches!(e, EvalError::NotCallable(_)));
}

#[test]
fn undefined_variable_read() {
    let e = eval_error("let result = ghost + 1");
    assert!(matches!(e, EvalError::UndefinedVariable(name) if name == "ghost"));
}

#[test]
fn type_mismatch_has_message() {
    let e = eval_error("let result = true * 2");
    assert!(matches!(e, EvalError::TypeMismatch(_)));
    assert!(!e.to_string().is_empty());
}

// ══════════════════════════════════════════════════════════════════════════
// Resource limits
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn infinite_loop_exhausts_gas() {
    let outcome = Executor::with_gas_limit(10_000).execute("while (true) { }");
    match outcome {
        codefun_eval::ExecOutcome::Error(msg) => {
            assert!(msg.contains("too long"), "unexpected message: {msg}")
        }
        other => panic!("expected gas exhaustion, got {other:?}"),
    }
}

#[test]
fn runaway_recursion_hits_call_depth() {
    let source = r#"
function down() { return down() }
let result = down()
"#;
    let e = eval_error(source);
    assert!(matches!(
        e,
        EvalError::CallDepthExceeded | EvalError::GasExhausted
    ));
}
