//! Statement parsing.
//!
//! Semicolons are optional terminators: every statement eats trailing
//! semicolons, and stray ones between statements are ignored.

use codefun_lexer::token::TokenKind;
use codefun_types::ast::*;
use codefun_types::DiagCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        let stmt = match self.peek_kind() {
            TokenKind::Function => self.parse_function().map(Stmt::Function),
            TokenKind::Let => self.parse_let().map(Stmt::Let),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::While => self.parse_while().map(Stmt::While),
            TokenKind::For => self.parse_for().map(Stmt::For),
            TokenKind::Return => self.parse_return().map(Stmt::Return),
            TokenKind::Break => {
                let span = self.advance().span;
                Some(Stmt::Break(span))
            }
            TokenKind::Continue => {
                let span = self.advance().span;
                Some(Stmt::Continue(span))
            }
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            _ => self.parse_expr_or_assign(),
        }?;

        while self.eat(&TokenKind::Semicolon) {}
        Some(stmt)
    }

    /// `function name(a, b) { body }`
    fn parse_function(&mut self) -> Option<FnDecl> {
        let start = self.advance().span; // 'function'
        let name = self.expect_identifier("after 'function'")?;

        self.expect(
            &TokenKind::LParen,
            DiagCode::UNEXPECTED_TOKEN,
            "after function name",
        )?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier("in parameter list")?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(
            &TokenKind::RParen,
            DiagCode::UNCLOSED_DELIMITER,
            "after parameters",
        )?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(FnDecl {
            name,
            params,
            body,
            span,
        })
    }

    /// `{ stmts }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self
            .expect(
                &TokenKind::LBrace,
                DiagCode::UNEXPECTED_TOKEN,
                "to open a block",
            )?
            .span;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    self.synchronize();
                    if self.diagnostics().at_capacity() {
                        break;
                    }
                }
            }
        }

        let end = self
            .expect(
                &TokenKind::RBrace,
                DiagCode::UNCLOSED_DELIMITER,
                "to close the block",
            )?
            .span;
        Some(Block {
            stmts,
            span: start.merge(end),
        })
    }

    /// `let name = value`
    fn parse_let(&mut self) -> Option<LetStmt> {
        let start = self.advance().span; // 'let'
        let name = self.expect_identifier("after 'let'")?;
        self.expect(
            &TokenKind::Assign,
            DiagCode::UNEXPECTED_TOKEN,
            "in let binding",
        )?;
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Some(LetStmt { name, value, span })
    }

    /// `if (cond) { } else if (..) { } else { }`
    fn parse_if(&mut self) -> Option<IfStmt> {
        let start = self.advance().span; // 'if'
        self.expect(&TokenKind::LParen, DiagCode::UNEXPECTED_TOKEN, "after 'if'")?;
        let cond = self.parse_expression()?;
        self.expect(
            &TokenKind::RParen,
            DiagCode::UNCLOSED_DELIMITER,
            "after condition",
        )?;
        let then_block = self.parse_block()?;

        let mut span = start.merge(then_block.span);
        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                let nested = self.parse_if()?;
                span = span.merge(nested.span);
                Some(ElseBranch::If(Box::new(nested)))
            } else {
                let block = self.parse_block()?;
                span = span.merge(block.span);
                Some(ElseBranch::Block(block))
            }
        } else {
            None
        };

        Some(IfStmt {
            cond,
            then_block,
            else_branch,
            span,
        })
    }

    /// `while (cond) { body }`
    fn parse_while(&mut self) -> Option<WhileStmt> {
        let start = self.advance().span; // 'while'
        self.expect(
            &TokenKind::LParen,
            DiagCode::UNEXPECTED_TOKEN,
            "after 'while'",
        )?;
        let cond = self.parse_expression()?;
        self.expect(
            &TokenKind::RParen,
            DiagCode::UNCLOSED_DELIMITER,
            "after condition",
        )?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(WhileStmt { cond, body, span })
    }

    /// `for (init; cond; step) { body }` — all three header slots optional.
    fn parse_for(&mut self) -> Option<ForStmt> {
        let start = self.advance().span; // 'for'
        self.expect(&TokenKind::LParen, DiagCode::UNEXPECTED_TOKEN, "after 'for'")?;

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if self.check(&TokenKind::Let) {
            Some(Box::new(Stmt::Let(self.parse_let()?)))
        } else {
            Some(Box::new(self.parse_expr_or_assign()?))
        };
        self.expect(
            &TokenKind::Semicolon,
            DiagCode::UNEXPECTED_TOKEN,
            "after for-loop initializer",
        )?;

        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(
            &TokenKind::Semicolon,
            DiagCode::UNEXPECTED_TOKEN,
            "after for-loop condition",
        )?;

        let step = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expr_or_assign()?))
        };
        self.expect(
            &TokenKind::RParen,
            DiagCode::UNCLOSED_DELIMITER,
            "after for-loop header",
        )?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(ForStmt {
            init,
            cond,
            step,
            body,
            span,
        })
    }

    /// `return` with an optional value on the same logical statement.
    fn parse_return(&mut self) -> Option<ReturnStmt> {
        let start = self.advance().span; // 'return'
        let value = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = value
            .as_ref()
            .map(|v| start.merge(v.span))
            .unwrap_or(start);
        Some(ReturnStmt { value, span })
    }

    /// An expression statement, or an assignment when the expression is
    /// followed by `=`, `+=`, `-=`, `++`, or `--`.
    pub(crate) fn parse_expr_or_assign(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression()?;

        let op = match self.peek_kind() {
            TokenKind::Assign => Some(AssignOp::Set),
            TokenKind::PlusAssign => Some(AssignOp::Add),
            TokenKind::MinusAssign => Some(AssignOp::Sub),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let target = self.assign_target(expr)?;
            let value = self.parse_expression()?;
            let span = target_span(&target).merge(value.span);
            return Some(Stmt::Assign(AssignStmt {
                target,
                op,
                value,
                span,
            }));
        }

        // `i++` / `i--` desugar to `i += 1` / `i -= 1`.
        if matches!(
            self.peek_kind(),
            TokenKind::PlusPlus | TokenKind::MinusMinus
        ) {
            let op = if self.check(&TokenKind::PlusPlus) {
                AssignOp::Add
            } else {
                AssignOp::Sub
            };
            let op_span = self.advance().span;
            let target = self.assign_target(expr)?;
            let span = target_span(&target).merge(op_span);
            let one = Expr::new(ExprKind::Number(1.0), op_span);
            return Some(Stmt::Assign(AssignStmt {
                target,
                op,
                value: one,
                span,
            }));
        }

        let span = expr.span;
        Some(Stmt::Expr(ExprStmt { expr, span }))
    }

    /// Check that the parsed expression is something assignable.
    fn assign_target(&mut self, expr: Expr) -> Option<AssignTarget> {
        match expr.kind {
            ExprKind::Name(name) => Some(AssignTarget::Name(Ident::new(name, expr.span))),
            ExprKind::Index { object, index } => Some(AssignTarget::Index {
                object: *object,
                index: *index,
            }),
            _ => {
                self.error_at_current(
                    DiagCode::INVALID_ASSIGNMENT_TARGET,
                    "only variables and list elements can be assigned to",
                );
                None
            }
        }
    }
}

fn target_span(target: &AssignTarget) -> codefun_types::Span {
    match target {
        AssignTarget::Name(ident) => ident.span,
        AssignTarget::Index { object, index } => object.span.merge(index.span),
    }
}
