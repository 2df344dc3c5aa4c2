//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 8. `||`
//! 7. `&&`
//! 6. `==`, `!=`, `===`, `!==`
//! 5. `<`, `>`, `<=`, `>=`
//! 4. `+`, `-`
//! 3. `*`, `/`, `%`
//! 2. unary `-`, `!`
//! 1. postfix `.method(...)`, `.property`, `[index]`

use codefun_lexer::token::TokenKind;
use codefun_types::ast::*;
use codefun_types::{DiagCode, Span};

use crate::parser::{Parser, MAX_EXPR_DEPTH};

impl<'src> Parser<'src> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                DiagCode::NESTING_TOO_DEEP,
                format!("expressions may nest at most {MAX_EXPR_DEPTH} levels deep"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    // ── Precedence chain ────────────────────────────────────────────────

    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = binary(left, BinOp::Or, right);
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = binary(left, BinOp::And, right);
        }
        Some(left)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                TokenKind::EqEqEq => BinOp::StrictEq,
                TokenKind::BangEqEq => BinOp::StrictNotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Less,
                TokenKind::LessEq => BinOp::LessEq,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Postfix chain: `.method(args)`, `.property`, `[index]`.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(&TokenKind::Dot) {
                let name = self.expect_identifier("after '.'")?;
                if self.check(&TokenKind::LParen) {
                    let (args, end) = self.parse_args()?;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::Method {
                            object: Box::new(expr),
                            method: name,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.merge(name.span);
                    expr = Expr::new(
                        ExprKind::Property {
                            object: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                let end = self
                    .expect(
                        &TokenKind::RBracket,
                        DiagCode::UNCLOSED_DELIMITER,
                        "after index expression",
                    )?
                    .span;
                let span = expr.span.merge(end);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Some(Expr::new(ExprKind::Number(*n), token.span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Some(Expr::new(ExprKind::Str(s.clone()), token.span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(false), token.span))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expr::new(ExprKind::Null, token.span))
            }
            TokenKind::Identifier(name) => {
                let ident = Ident::new(name.clone(), token.span);
                self.advance();
                if self.check(&TokenKind::LParen) {
                    let (args, end) = self.parse_args()?;
                    let span = token.span.merge(end);
                    Some(Expr::new(ExprKind::Call { name: ident, args }, span))
                } else {
                    Some(Expr::new(ExprKind::Name(ident.name), token.span))
                }
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let end = self
                    .expect(
                        &TokenKind::RParen,
                        DiagCode::UNCLOSED_DELIMITER,
                        "to close the group",
                    )?
                    .span;
                let span = token.span.merge(end);
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }
            _ => {
                self.error_at_current(
                    DiagCode::EXPECTED_EXPRESSION,
                    format!("expected an expression, found {}", token.kind),
                );
                None
            }
        }
    }

    /// `[a, b, c]`
    fn parse_list_literal(&mut self) -> Option<Expr> {
        let start = self.advance().span; // '['
        let mut elems = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                elems.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self
            .expect(
                &TokenKind::RBracket,
                DiagCode::UNCLOSED_DELIMITER,
                "to close the list",
            )?
            .span;
        Some(Expr::new(ExprKind::List(elems), start.merge(end)))
    }

    /// `(a, b, c)` — caller has checked the `(` is present.
    fn parse_args(&mut self) -> Option<(Vec<Expr>, Span)> {
        self.expect(
            &TokenKind::LParen,
            DiagCode::UNEXPECTED_TOKEN,
            "to open the argument list",
        )?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self
            .expect(
                &TokenKind::RParen,
                DiagCode::UNCLOSED_DELIMITER,
                "to close the argument list",
            )?
            .span;
        Some((args, end))
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
