//! Core statement and expression evaluator.

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::executor::Sandbox;
use crate::value::Value;
use codefun_types::ast::*;
use std::rc::Rc;

/// Default step budget. Challenge solutions use a few thousand steps;
/// the budget exists to stop `while (true) {}` from freezing the page.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// Maximum depth of nested function calls.
pub const MAX_CALL_DEPTH: usize = 200;

/// The evaluator — walks AST nodes and produces [`Value`]s.
///
/// User code's only window to the outside world is `sandbox.log(...)`;
/// everything else is pure computation over the environment.
pub struct Evaluator {
    pub env: Environment,
    pub sandbox: Sandbox,
    gas: u64,
    gas_limit: u64,
}

impl Evaluator {
    pub fn new(sandbox: Sandbox) -> Self {
        Self::with_gas_limit(sandbox, DEFAULT_GAS_LIMIT)
    }

    pub fn with_gas_limit(sandbox: Sandbox, gas_limit: u64) -> Self {
        Self {
            env: Environment::new(),
            sandbox,
            gas: 0,
            gas_limit,
        }
    }

    /// Burn one unit of gas.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(EvalError::GasExhausted)
        } else {
            Ok(())
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program execution
    // ══════════════════════════════════════════════════════════════════════

    /// Run a whole program: hoist top-level function declarations, then
    /// execute the remaining statements in order.
    pub fn run_program(&mut self, program: &Program) -> EvalResult<()> {
        for stmt in &program.stmts {
            if let Stmt::Function(decl) = stmt {
                self.env
                    .define_global(&decl.name.name, Value::Function(Rc::new(decl.clone())));
            }
        }
        for stmt in &program.stmts {
            if matches!(stmt, Stmt::Function(_)) {
                continue;
            }
            match self.exec_stmt(stmt) {
                // A stray top-level `return` ends the program quietly,
                // the way a function body would end.
                Err(EvalError::Return(_)) => return Ok(()),
                other => other?,
            }
        }
        Ok(())
    }

    /// Call a function bound in the global scope by name.
    pub fn call_by_name(&mut self, name: &str, args: Vec<Value>) -> EvalResult<Value> {
        let decl = match self.env.get(name) {
            Some(Value::Function(decl)) => decl.clone(),
            Some(_) => return Err(EvalError::NotCallable(name.to_string())),
            None => return Err(EvalError::UndefinedFunction(name.to_string())),
        };
        self.call_function(decl, args)
    }

    fn call_function(&mut self, decl: Rc<FnDecl>, mut args: Vec<Value>) -> EvalResult<Value> {
        self.tick()?;
        if self.env.frame_count() >= MAX_CALL_DEPTH {
            return Err(EvalError::CallDepthExceeded);
        }

        // JS calling convention: missing arguments become null,
        // extras are dropped.
        args.resize(decl.params.len(), Value::Null);

        self.env.push_frame();
        for (param, arg) in decl.params.iter().zip(args) {
            self.env.define(&param.name, arg);
        }
        let outcome = self.exec_stmts(&decl.body.stmts);
        self.env.pop_frame();

        match outcome {
            Ok(()) => Ok(Value::Null),
            Err(EvalError::Return(value)) => Ok(value),
            Err(e) => Err(e),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        self.tick()?;
        match stmt {
            Stmt::Function(decl) => {
                // Nested declarations define at execution time, in the
                // current scope.
                self.env
                    .define(&decl.name.name, Value::Function(Rc::new(decl.clone())));
                Ok(())
            }
            Stmt::Let(let_stmt) => {
                let value = self.eval_expr(&let_stmt.value)?;
                self.env.define(&let_stmt.name.name, value);
                Ok(())
            }
            Stmt::Assign(assign) => self.exec_assign(assign),
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                Err(EvalError::Return(value))
            }
            Stmt::Break(_) => Err(EvalError::Break),
            Stmt::Continue(_) => Err(EvalError::Continue),
            Stmt::Block(block) => self.exec_block(block),
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
                Ok(())
            }
        }
    }

    fn exec_block(&mut self, block: &Block) -> EvalResult<()> {
        self.env.push_scope();
        let result = self.exec_stmts(&block.stmts);
        self.env.pop_scope();
        result
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_assign(&mut self, assign: &AssignStmt) -> EvalResult<()> {
        let rhs = self.eval_expr(&assign.value)?;
        match &assign.target {
            AssignTarget::Name(ident) => {
                let name = &ident.name;
                let current = self
                    .env
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
                let updated = apply_assign_op(assign.op, current, rhs)?;
                self.env.set(name, updated);
                Ok(())
            }
            AssignTarget::Index { object, index } => {
                let idx = self.eval_expr(index)?;
                self.write_through_index(object, idx, assign.op, rhs)
            }
        }
    }

    /// `xs[i] = v` (and `xs[i] += v`). The object must resolve to a
    /// named list so the update can be written back.
    fn write_through_index(
        &mut self,
        object: &Expr,
        index: Value,
        op: AssignOp,
        rhs: Value,
    ) -> EvalResult<()> {
        let ExprKind::Name(name) = &object.kind else {
            return Err(EvalError::TypeMismatch(
                "only list variables support indexed assignment".to_string(),
            ));
        };
        let current = self
            .env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
        let mut items = match current {
            Value::List(items) => items,
            other => {
                return Err(EvalError::TypeMismatch(format!(
                    "cannot index-assign into a {}",
                    other.type_name()
                )))
            }
        };
        let Value::Number(n) = index else {
            return Err(EvalError::TypeMismatch(format!(
                "list index must be a number, got {}",
                index.type_name()
            )));
        };
        let idx = n as usize;
        if n < 0.0 || n.fract() != 0.0 || idx >= items.len() {
            return Err(EvalError::IndexOutOfRange {
                index: n,
                len: items.len(),
            });
        }
        let updated = apply_assign_op(op, items[idx].clone(), rhs)?;
        items[idx] = updated;
        self.env.set(name, Value::List(items));
        Ok(())
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> EvalResult<()> {
        if self.eval_expr(&if_stmt.cond)?.is_truthy() {
            return self.exec_block(&if_stmt.then_block);
        }
        match &if_stmt.else_branch {
            Some(ElseBranch::If(nested)) => self.exec_if(nested),
            Some(ElseBranch::Block(block)) => self.exec_block(block),
            None => Ok(()),
        }
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt) -> EvalResult<()> {
        while self.eval_expr(&while_stmt.cond)?.is_truthy() {
            match self.exec_block(&while_stmt.body) {
                Err(EvalError::Break) => break,
                Err(EvalError::Continue) => continue,
                other => other?,
            }
        }
        Ok(())
    }

    fn exec_for(&mut self, for_stmt: &ForStmt) -> EvalResult<()> {
        // The header's `let` lives in a scope that wraps the whole loop.
        self.env.push_scope();
        let result = self.exec_for_inner(for_stmt);
        self.env.pop_scope();
        result
    }

    fn exec_for_inner(&mut self, for_stmt: &ForStmt) -> EvalResult<()> {
        if let Some(init) = &for_stmt.init {
            self.exec_stmt(init)?;
        }
        loop {
            if let Some(cond) = &for_stmt.cond {
                if !self.eval_expr(cond)?.is_truthy() {
                    break;
                }
            }
            match self.exec_block(&for_stmt.body) {
                Err(EvalError::Break) => break,
                Err(EvalError::Continue) | Ok(()) => {}
                Err(e) => return Err(e),
            }
            if let Some(step) = &for_stmt.step {
                self.exec_stmt(step)?;
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::List(elems) => {
                let mut items = Vec::with_capacity(elems.len());
                for elem in elems {
                    items.push(self.eval_expr(elem)?);
                }
                Ok(Value::List(items))
            }
            ExprKind::Name(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            ExprKind::Call { name, args } => self.eval_call(&name.name, args),
            ExprKind::Method {
                object,
                method,
                args,
            } => self.eval_method(object, &method.name, args),
            ExprKind::Property { object, name } => self.eval_property(object, &name.name),
            ExprKind::Index { object, index } => {
                let obj = self.eval_expr(object)?;
                let idx = self.eval_expr(index)?;
                eval_index(obj, idx)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                eval_unary(*op, value)
            }
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        // `log` is the sandbox's one primitive; it shadows nothing
        // because user code cannot define a binding over it.
        if name == "log" {
            self.sandbox.log(values);
            return Ok(Value::Null);
        }
        self.call_by_name(name, values)
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // && and || short-circuit and yield the operand itself.
        if op == BinOp::And {
            let lhs = self.eval_expr(left)?;
            return if lhs.is_truthy() {
                self.eval_expr(right)
            } else {
                Ok(lhs)
            };
        }
        if op == BinOp::Or {
            let lhs = self.eval_expr(left)?;
            return if lhs.is_truthy() {
                Ok(lhs)
            } else {
                self.eval_expr(right)
            };
        }

        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        eval_binary_values(lhs, op, rhs)
    }

    fn eval_property(&mut self, object: &Expr, name: &str) -> EvalResult<Value> {
        let obj = self.eval_expr(object)?;
        match (name, &obj) {
            ("length", Value::Str(s)) => Ok(Value::Number(s.chars().count() as f64)),
            ("length", Value::List(items)) => Ok(Value::Number(items.len() as f64)),
            _ => Err(EvalError::UnknownProperty(
                name.to_string(),
                obj.type_name(),
            )),
        }
    }

    fn eval_method(&mut self, object: &Expr, method: &str, args: &[Expr]) -> EvalResult<Value> {
        let obj = self.eval_expr(object)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        match obj {
            Value::Str(s) => eval_string_method(&s, method, &values),
            Value::List(items) => self.eval_list_method(object, items, method, values),
            other => Err(EvalError::UnknownMethod(
                method.to_string(),
                other.type_name(),
            )),
        }
    }

    /// List methods. `push` and `reverse` mutate in JS, so when the
    /// receiver is a plain variable the result is written back to it.
    fn eval_list_method(
        &mut self,
        object: &Expr,
        mut items: Vec<Value>,
        method: &str,
        mut args: Vec<Value>,
    ) -> EvalResult<Value> {
        match method {
            "push" => {
                items.append(&mut args);
                let len = items.len();
                self.write_back(object, Value::List(items));
                Ok(Value::Number(len as f64))
            }
            "reverse" => {
                items.reverse();
                let reversed = Value::List(items);
                self.write_back(object, reversed.clone());
                Ok(reversed)
            }
            "join" => {
                let sep = match args.first() {
                    Some(Value::Str(s)) => s.clone(),
                    Some(other) => other.display_string(),
                    None => ",".to_string(),
                };
                let joined = items
                    .iter()
                    .map(Value::display_string)
                    .collect::<Vec<_>>()
                    .join(&sep);
                Ok(Value::Str(joined))
            }
            "includes" => {
                let needle = args.into_iter().next().unwrap_or(Value::Null);
                Ok(Value::Bool(items.contains(&needle)))
            }
            _ => Err(EvalError::UnknownMethod(method.to_string(), "list")),
        }
    }

    fn write_back(&mut self, object: &Expr, value: Value) {
        if let ExprKind::Name(name) = &object.kind {
            self.env.set(name, value);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Value-level operations
// ══════════════════════════════════════════════════════════════════════════

fn apply_assign_op(op: AssignOp, current: Value, rhs: Value) -> EvalResult<Value> {
    match op {
        AssignOp::Set => Ok(rhs),
        AssignOp::Add => eval_binary_values(current, BinOp::Add, rhs),
        AssignOp::Sub => eval_binary_values(current, BinOp::Sub, rhs),
    }
}

fn eval_binary_values(lhs: Value, op: BinOp, rhs: Value) -> EvalResult<Value> {
    match op {
        BinOp::Add => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!(
                "{}{}",
                lhs.display_string(),
                rhs.display_string()
            ))),
            _ => Err(type_error("+", &lhs, &rhs)),
        },
        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            let (Value::Number(a), Value::Number(b)) = (&lhs, &rhs) else {
                return Err(type_error(op.symbol(), &lhs, &rhs));
            };
            // Division and remainder follow IEEE 754, like JS: x/0 is
            // infinite, 0/0 and x%0 are NaN, and % keeps the sign of
            // the dividend.
            Ok(Value::Number(match op {
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Mod => a % b,
                _ => unreachable!(),
            }))
        }
        BinOp::Eq | BinOp::StrictEq => Ok(Value::Bool(lhs == rhs)),
        BinOp::NotEq | BinOp::StrictNotEq => Ok(Value::Bool(lhs != rhs)),
        BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
            compare(op, &lhs, &rhs)
        }
        BinOp::And | BinOp::Or => unreachable!("short-circuit ops handled by the evaluator"),
    }
}

fn compare(op: BinOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    let ordering = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => return Err(type_error(op.symbol(), lhs, rhs)),
    };
    // NaN comparisons are false in every direction.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinOp::Less => ordering.is_lt(),
        BinOp::LessEq => ordering.is_le(),
        BinOp::Greater => ordering.is_gt(),
        BinOp::GreaterEq => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}

fn eval_unary(op: UnaryOp, value: Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Neg => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(EvalError::TypeMismatch(format!(
                "unary '-' needs a number, got {}",
                other.type_name()
            ))),
        },
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
    }
}

/// `obj[index]`. Out-of-range and fractional indexes yield `null`, the
/// way JS yields `undefined`.
fn eval_index(obj: Value, idx: Value) -> EvalResult<Value> {
    let Value::Number(n) = idx else {
        return Err(EvalError::TypeMismatch(format!(
            "index must be a number, got {}",
            idx.type_name()
        )));
    };
    if n < 0.0 || n.fract() != 0.0 {
        return Ok(Value::Null);
    }
    let i = n as usize;
    match obj {
        Value::Str(s) => Ok(s
            .chars()
            .nth(i)
            .map(|c| Value::Str(c.to_string()))
            .unwrap_or(Value::Null)),
        Value::List(items) => Ok(items.get(i).cloned().unwrap_or(Value::Null)),
        other => Err(EvalError::TypeMismatch(format!(
            "cannot index into a {}",
            other.type_name()
        ))),
    }
}

fn eval_string_method(s: &str, method: &str, args: &[Value]) -> EvalResult<Value> {
    match method {
        "toLowerCase" => Ok(Value::Str(s.to_lowercase())),
        "toUpperCase" => Ok(Value::Str(s.to_uppercase())),
        "trim" => Ok(Value::Str(s.trim().to_string())),
        "charAt" => {
            let i = match args.first() {
                Some(Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => *n as usize,
                _ => return Ok(Value::Str(String::new())),
            };
            Ok(Value::Str(
                s.chars().nth(i).map(String::from).unwrap_or_default(),
            ))
        }
        "includes" => {
            let Some(Value::Str(needle)) = args.first() else {
                return Err(EvalError::TypeMismatch(
                    "includes needs a string argument".to_string(),
                ));
            };
            Ok(Value::Bool(s.contains(needle.as_str())))
        }
        "split" => {
            let Some(Value::Str(sep)) = args.first() else {
                return Err(EvalError::TypeMismatch(
                    "split needs a string separator".to_string(),
                ));
            };
            let parts: Vec<Value> = if sep.is_empty() {
                s.chars().map(|c| Value::Str(c.to_string())).collect()
            } else {
                s.split(sep.as_str())
                    .map(|p| Value::Str(p.to_string()))
                    .collect()
            };
            Ok(Value::List(parts))
        }
        _ => Err(EvalError::UnknownMethod(method.to_string(), "string")),
    }
}

fn type_error(op: &str, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeMismatch(format!(
        "'{op}' cannot combine {} and {}",
        lhs.type_name(),
        rhs.type_name()
    ))
}
