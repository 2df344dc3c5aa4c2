//! AST for the CodeFun challenge language.
//!
//! Every node carries a [`Span`] for diagnostics. Recursive expression
//! positions are boxed to keep the enum size down.

use crate::Span;

/// A complete submission: the statements of one source file, in order.
///
/// Top-level `function` declarations hoist — the evaluator defines all of
/// them before running any other statement — so a submission that is
/// nothing but a function definition still "executes" cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `function name(params) { body }`
    Function(FnDecl),
    /// `let name = value`
    Let(LetStmt),
    /// `target = value`, `target += value`, `i++`, ...
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Block(Block),
    /// An expression evaluated for its effect, e.g. `log("hi")`.
    Expr(ExprStmt),
}

/// `function name(a, b) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// `{ stmts }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `let name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// Assignment operator. `i++`/`i--` are parsed as `Add`/`Sub` with a
/// literal `1` on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
}

/// What an assignment writes to.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Name(Ident),
    /// `xs[i] = v`
    Index { object: Expr, index: Expr },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: AssignTarget,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

/// `else if ...` chains nest; a plain `else` terminates the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

/// C-style `for (init; cond; step) { body }`. All three header slots are
/// optional; `for (;;)` is an infinite loop (gas-limited at runtime).
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub step: Option<Box<Stmt>>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// Variable reference.
    Name(String),
    /// Call by name: `isEven(4)`, `log(x)`. The language has no
    /// first-class callee expressions.
    Call { name: Ident, args: Vec<Expr> },
    /// `obj.method(args)`
    Method {
        object: Box<Expr>,
        method: Ident,
        args: Vec<Expr>,
    },
    /// `obj.name` — currently only `.length`.
    Property { object: Box<Expr>, name: Ident },
    /// `obj[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators. `Eq`/`NotEq` come from `==`/`!=` and `StrictEq`/
/// `StrictNotEq` from `===`/`!==`; all four compare strictly — loose
/// JS coercion is deliberately not replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinOp {
    /// Operator as written in source, for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNotEq => "!==",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}
