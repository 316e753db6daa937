//! Executable AST nodes.
//!
//! Expressions expose `evaluate() → Value` and are read-only with respect
//! to the environment; statements expose `execute(context)` and may write
//! it. Every node is bound at construction to the [`ScopeId`] it resolves
//! names against.
//!
//! Truthiness does not exist: a condition holds iff its value is
//! *identical* to the `True` singleton resolved through the scope chain.
//! Comparisons and logic therefore produce the environment's `True`/
//! `False` bindings, never native booleans.

use crate::env::{Environment, ScopeId};
use crate::error::{EvalError, EvalResult};
use crate::module::Context;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;
use weft_types::{Span, Value};

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression bound to its scope.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Numeric literal.
    Number(f64),
    /// Text literal.
    Text(String),
    /// Name resolved through the scope chain.
    Id(String),
    /// Member lookup: resolve `child` on the parent's record value.
    Lookup { parent: Box<Expr>, child: String },
    /// Record literal, fields in declaration order.
    Record(Vec<(String, Expr)>),
    /// Operator application: `apply("+", [a, b])`.
    Apply { op: String, args: Vec<Expr> },
    /// Current simulated clock (µs) from the context.
    Clock,
    /// Host-registered expression, the extension point for call-like
    /// node kinds the grammar does not define.
    Foreign(ForeignFn),
}

/// Host callback behind [`ExprKind::Foreign`].
#[derive(Clone)]
pub struct ForeignFn(pub Rc<dyn Fn(&Environment, &Context) -> EvalResult<Value>>);

impl fmt::Debug for ForeignFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignFn")
    }
}

impl Expr {
    /// Evaluate to a [`Value`]. Read-only with respect to the environment.
    pub fn evaluate(&self, env: &Environment, ctx: &Context) -> EvalResult<Value> {
        match &self.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Text(s) => Ok(Value::Text(s.clone())),
            ExprKind::Id(name) => env.get(self.scope, name).cloned(),
            ExprKind::Lookup { parent, child } => self.eval_lookup(parent, child, env, ctx),
            ExprKind::Record(fields) => self.eval_record(fields, env, ctx),
            ExprKind::Apply { op, args } => self.eval_apply(op, args, env, ctx),
            ExprKind::Clock => Ok(Value::Number(ctx.clock as f64)),
            ExprKind::Foreign(f) => (f.0)(env, ctx),
        }
    }

    fn eval_lookup(
        &self,
        parent: &Expr,
        child: &str,
        env: &Environment,
        ctx: &Context,
    ) -> EvalResult<Value> {
        let value = parent.evaluate(env, ctx)?;
        match value {
            Value::Record(fields) => {
                fields
                    .get(child)
                    .cloned()
                    .ok_or_else(|| EvalError::LookupError {
                        child: child.to_string(),
                    })
            }
            other => Err(EvalError::TypeError(format!(
                "cannot look up '{child}' on {}",
                other.type_name()
            ))),
        }
    }

    fn eval_record(
        &self,
        fields: &[(String, Expr)],
        env: &Environment,
        ctx: &Context,
    ) -> EvalResult<Value> {
        let mut members = BTreeMap::new();
        for (name, expr) in fields {
            let value = expr.evaluate(env, ctx)?;
            members.insert(name.clone(), value);
        }
        Ok(Value::Record(members))
    }

    // ── Operator application ─────────────────────────────────────────────

    fn eval_apply(
        &self,
        op: &str,
        args: &[Expr],
        env: &Environment,
        ctx: &Context,
    ) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(arg.evaluate(env, ctx)?);
        }

        match op {
            "+" | "-" | "*" | "/" | "%" => {
                let (a, b) = binary(op, &values)?;
                self.eval_arith(op, number(op, a)?, number(op, b)?)
            }
            "==" => {
                let (a, b) = binary(op, &values)?;
                self.bool_value(env, a == b)
            }
            "!=" => {
                let (a, b) = binary(op, &values)?;
                self.bool_value(env, a != b)
            }
            "<" | "<=" | ">" | ">=" => {
                let (a, b) = binary(op, &values)?;
                let (a, b) = (number(op, a)?, number(op, b)?);
                let result = match op {
                    "<" => a < b,
                    "<=" => a <= b,
                    ">" => a > b,
                    _ => a >= b,
                };
                self.bool_value(env, result)
            }
            "and" => {
                let (a, b) = binary(op, &values)?;
                let result = self.is_true(env, a)? && self.is_true(env, b)?;
                self.bool_value(env, result)
            }
            "or" => {
                let (a, b) = binary(op, &values)?;
                let result = self.is_true(env, a)? || self.is_true(env, b)?;
                self.bool_value(env, result)
            }
            "not" => {
                let a = unary(op, &values)?;
                let result = !self.is_true(env, a)?;
                self.bool_value(env, result)
            }
            _ => Err(EvalError::TypeError(format!("unknown operator '{op}'"))),
        }
    }

    fn eval_arith(&self, op: &str, a: f64, b: f64) -> EvalResult<Value> {
        if (op == "/" || op == "%") && b == 0.0 {
            return Err(EvalError::ArithmeticError(format!("{op} by zero")));
        }
        let result = match op {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => a / b,
            _ => a % b,
        };
        if !result.is_finite() {
            return Err(EvalError::ArithmeticError(format!(
                "'{op}' produced a non-finite result"
            )));
        }
        Ok(Value::Number(result))
    }

    /// Resolve the `True`/`False` singleton bound in the active chain.
    fn bool_value(&self, env: &Environment, value: bool) -> EvalResult<Value> {
        env.get(self.scope, if value { "True" } else { "False" })
            .cloned()
    }

    /// Identity test against the chain-resolved `True` singleton.
    fn is_true(&self, env: &Environment, value: &Value) -> EvalResult<bool> {
        Ok(value.is(env.get(self.scope, "True")?))
    }
}

fn binary<'a>(op: &str, values: &'a [Value]) -> EvalResult<(&'a Value, &'a Value)> {
    match values {
        [a, b] => Ok((a, b)),
        _ => Err(EvalError::TypeError(format!(
            "'{op}' takes 2 operands, got {}",
            values.len()
        ))),
    }
}

fn unary<'a>(op: &str, values: &'a [Value]) -> EvalResult<&'a Value> {
    match values {
        [a] => Ok(a),
        _ => Err(EvalError::TypeError(format!(
            "'{op}' takes 1 operand, got {}",
            values.len()
        ))),
    }
}

fn number(op: &str, value: &Value) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::TypeError(format!(
            "'{op}' requires numbers, got {}",
            other.type_name()
        ))),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement bound to its scope.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Ordered child statements.
    Sequence(Vec<Stmt>),
    /// Declare a binding in the local frame. Initialize-once: a later
    /// execution of the same declaration leaves the binding untouched.
    VarDecl {
        name: String,
        value: Expr,
        constant: bool,
    },
    /// Write an existing or new local binding.
    Assign { name: String, value: Expr },
    /// Strictly binary conditional; no third "unknown" branch.
    IfElse {
        condition: Expr,
        then_block: Box<Stmt>,
        else_block: Box<Stmt>,
    },
    /// Named rule body, executed every step.
    Rule { name: String, body: Box<Stmt> },
    /// Append a value's display form to the context output.
    Print { value: Expr },
}

impl Stmt {
    /// Execute against the environment. May mutate local bindings.
    pub fn execute(&self, env: &mut Environment, ctx: &mut Context) -> EvalResult<()> {
        match &self.kind {
            StmtKind::Sequence(stmts) => {
                for stmt in stmts {
                    stmt.execute(env, ctx)?;
                }
                Ok(())
            }
            StmtKind::VarDecl {
                name,
                value,
                constant,
            } => {
                // Initialize-once: the program re-executes every step, so a
                // declaration that already took effect is left untouched.
                if !env.is_local(self.scope, name) {
                    let v = value.evaluate(env, ctx)?;
                    env.declare(self.scope, name, v, *constant);
                }
                Ok(())
            }
            StmtKind::Assign { name, value } => {
                let v = value.evaluate(env, ctx)?;
                env.set(self.scope, name, v);
                Ok(())
            }
            StmtKind::IfElse {
                condition,
                then_block,
                else_block,
            } => {
                let cond = condition.evaluate(env, ctx)?;
                // Identity against the chain-resolved True singleton; any
                // other value (an explicit False included) is "not true".
                if cond.is(env.get(self.scope, "True")?) {
                    then_block.execute(env, ctx)
                } else {
                    else_block.execute(env, ctx)
                }
            }
            StmtKind::Rule { name, body } => {
                trace!(rule = %name, "firing rule");
                body.execute(env, ctx)
            }
            StmtKind::Print { value } => {
                let v = value.evaluate(env, ctx)?;
                ctx.output.push(v.to_string());
                Ok(())
            }
        }
    }
}
