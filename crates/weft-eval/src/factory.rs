//! Tag-dispatching factory from parsed nodes to executable AST.
//!
//! Two registration tables map a node's discriminant tag to a builder
//! function. Adding a node kind means registering a new builder — no
//! existing builder changes. Dispatch on an unregistered tag fails with
//! [`EvalError::UnknownNodeType`].

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::env::ScopeId;
use crate::error::{EvalError, EvalResult};
use std::collections::BTreeMap;
use weft_types::Node;

/// Builds an expression from a node with a matching tag.
pub type ExprBuilder = fn(&Factory, &Node, ScopeId) -> EvalResult<Expr>;

/// Builds a statement from a node with a matching tag.
pub type StmtBuilder = fn(&Factory, &Node, ScopeId) -> EvalResult<Stmt>;

/// Registration tables for expression and statement node kinds.
pub struct Factory {
    exprs: BTreeMap<String, ExprBuilder>,
    stmts: BTreeMap<String, StmtBuilder>,
}

impl Factory {
    /// Empty factory with no registered node kinds.
    pub fn new() -> Self {
        Self {
            exprs: BTreeMap::new(),
            stmts: BTreeMap::new(),
        }
    }

    /// Factory with the full grammar registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register_expr("number", build_number);
        factory.register_expr("text", build_text);
        factory.register_expr("id", build_id);
        factory.register_expr("lookup", build_lookup);
        factory.register_expr("record", build_record);
        factory.register_expr("apply", build_apply);
        factory.register_expr("clock", build_clock);

        factory.register_stmt("sequence", build_sequence);
        factory.register_stmt("vardecl", build_vardecl);
        factory.register_stmt("assign", build_assign);
        factory.register_stmt("ifelse", build_ifelse);
        factory.register_stmt("rule", build_rule);
        factory.register_stmt("print", build_print);
        factory
    }

    /// Register an expression node kind.
    pub fn register_expr(&mut self, tag: impl Into<String>, builder: ExprBuilder) {
        self.exprs.insert(tag.into(), builder);
    }

    /// Register a statement node kind.
    pub fn register_stmt(&mut self, tag: impl Into<String>, builder: StmtBuilder) {
        self.stmts.insert(tag.into(), builder);
    }

    /// Construct an expression bound to `scope`.
    pub fn expression(&self, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
        match self.exprs.get(node.tag.as_str()) {
            Some(builder) => builder(self, node, scope),
            None => Err(EvalError::UnknownNodeType {
                tag: node.tag.clone(),
            }),
        }
    }

    /// Construct a statement bound to `scope`.
    pub fn statement(&self, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
        match self.stmts.get(node.tag.as_str()) {
            Some(builder) => builder(self, node, scope),
            None => Err(EvalError::UnknownNodeType {
                tag: node.tag.clone(),
            }),
        }
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Attribute access
// ══════════════════════════════════════════════════════════════════════════════

fn missing(node: &Node, field: &str) -> EvalError {
    EvalError::MalformedNode {
        tag: node.tag.clone(),
        field: field.to_string(),
    }
}

fn req_text<'a>(node: &'a Node, field: &str) -> EvalResult<&'a str> {
    node.text(field).ok_or_else(|| missing(node, field))
}

fn req_number(node: &Node, field: &str) -> EvalResult<f64> {
    node.number(field).ok_or_else(|| missing(node, field))
}

fn req_child<'a>(node: &'a Node, field: &str) -> EvalResult<&'a Node> {
    node.child(field).ok_or_else(|| missing(node, field))
}

fn req_list<'a>(node: &'a Node, field: &str) -> EvalResult<&'a [Node]> {
    node.list(field).ok_or_else(|| missing(node, field))
}

// ══════════════════════════════════════════════════════════════════════════════
// Expression builders
// ══════════════════════════════════════════════════════════════════════════════

fn expr(kind: ExprKind, node: &Node, scope: ScopeId) -> Expr {
    Expr {
        kind,
        scope,
        span: node.span,
    }
}

fn build_number(_f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let value = req_number(node, "value")?;
    Ok(expr(ExprKind::Number(value), node, scope))
}

fn build_text(_f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let value = req_text(node, "value")?;
    Ok(expr(ExprKind::Text(value.to_string()), node, scope))
}

fn build_id(_f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let name = req_text(node, "name")?;
    Ok(expr(ExprKind::Id(name.to_string()), node, scope))
}

fn build_lookup(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let parent = f.expression(req_child(node, "parent")?, scope)?;
    let child = req_text(node, "child")?;
    Ok(expr(
        ExprKind::Lookup {
            parent: Box::new(parent),
            child: child.to_string(),
        },
        node,
        scope,
    ))
}

fn build_record(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let mut fields = Vec::new();
    for field_node in req_list(node, "fields")? {
        let name = req_text(field_node, "name")?;
        let value = f.expression(req_child(field_node, "value")?, scope)?;
        fields.push((name.to_string(), value));
    }
    Ok(expr(ExprKind::Record(fields), node, scope))
}

fn build_apply(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    let op = req_text(node, "op")?;
    let mut args = Vec::new();
    for arg in req_list(node, "args")? {
        args.push(f.expression(arg, scope)?);
    }
    Ok(expr(
        ExprKind::Apply {
            op: op.to_string(),
            args,
        },
        node,
        scope,
    ))
}

fn build_clock(_f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Expr> {
    Ok(expr(ExprKind::Clock, node, scope))
}

// ══════════════════════════════════════════════════════════════════════════════
// Statement builders
// ══════════════════════════════════════════════════════════════════════════════

fn stmt(kind: StmtKind, node: &Node, scope: ScopeId) -> Stmt {
    Stmt {
        kind,
        scope,
        span: node.span,
    }
}

fn build_sequence(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let mut stmts = Vec::new();
    for child in req_list(node, "statements")? {
        stmts.push(f.statement(child, scope)?);
    }
    Ok(stmt(StmtKind::Sequence(stmts), node, scope))
}

fn build_vardecl(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let name = req_text(node, "id")?;
    let value = f.expression(req_child(node, "value")?, scope)?;
    let constant = node.flag("constant").unwrap_or(false);
    Ok(stmt(
        StmtKind::VarDecl {
            name: name.to_string(),
            value,
            constant,
        },
        node,
        scope,
    ))
}

fn build_assign(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let name = req_text(node, "id")?;
    let value = f.expression(req_child(node, "value")?, scope)?;
    Ok(stmt(
        StmtKind::Assign {
            name: name.to_string(),
            value,
        },
        node,
        scope,
    ))
}

fn build_ifelse(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let condition = f.expression(req_child(node, "condition")?, scope)?;
    let then_block = f.statement(req_child(node, "thenblock")?, scope)?;
    // An absent else block is an empty sequence.
    let else_block = match node.child("elseblock") {
        Some(child) => f.statement(child, scope)?,
        None => stmt(StmtKind::Sequence(Vec::new()), node, scope),
    };
    Ok(stmt(
        StmtKind::IfElse {
            condition,
            then_block: Box::new(then_block),
            else_block: Box::new(else_block),
        },
        node,
        scope,
    ))
}

fn build_rule(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let name = req_text(node, "id")?;
    let body = f.statement(req_child(node, "block")?, scope)?;
    Ok(stmt(
        StmtKind::Rule {
            name: name.to_string(),
            body: Box::new(body),
        },
        node,
        scope,
    ))
}

fn build_print(f: &Factory, node: &Node, scope: ScopeId) -> EvalResult<Stmt> {
    let value = f.expression(req_child(node, "value")?, scope)?;
    Ok(stmt(StmtKind::Print { value }, node, scope))
}
