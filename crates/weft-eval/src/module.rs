//! Modules and the per-step execution context.
//!
//! A [`Module`] is the immutable pairing of a compiled program and the
//! environment it runs against (prelude frame → module frame). The
//! [`Context`] is rebuilt by the driver for every execution and never
//! persisted.

use crate::ast::Stmt;
use crate::env::{Environment, ScopeId};
use crate::error::EvalResult;
use crate::factory::Factory;
use crate::prelude;
use std::collections::BTreeMap;
use weft_types::{Node, Value};

/// Ephemeral per-execution data threaded through every
/// `evaluate`/`execute` call.
#[derive(Debug, Clone)]
pub struct Context {
    /// Simulated clock, microseconds.
    pub clock: u64,
    /// Output collected from `print` statements during this execution.
    pub output: Vec<String>,
}

impl Context {
    pub fn new(clock: u64) -> Self {
        Self {
            clock,
            output: Vec::new(),
        }
    }
}

/// A compiled program paired with its environment.
#[derive(Debug)]
pub struct Module {
    pub name: String,
    pub program: Stmt,
    pub env: Environment,
    /// The module frame — the scope change computation observes.
    pub scope: ScopeId,
}

impl Module {
    /// Execute the program once against the given context.
    pub fn execute(&mut self, ctx: &mut Context) -> EvalResult<()> {
        self.program.execute(&mut self.env, ctx)
    }

    /// Ad hoc evaluation against the *live* module scope.
    ///
    /// Re-enters the same factory pipeline as `load`; side effects
    /// persist into subsequent executions.
    pub fn eval(&mut self, node: &Node, factory: &Factory, ctx: &mut Context) -> EvalResult<()> {
        let stmt = factory.statement(node, self.scope)?;
        stmt.execute(&mut self.env, ctx)
    }

    /// Clone of the module frame's values, for change computation.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.env.snapshot(self.scope)
    }
}

/// Load a module from a parsed node tree with the default grammar.
pub fn load(name: impl Into<String>, tree: &Node) -> EvalResult<Module> {
    load_with(&Factory::with_defaults(), name, tree)
}

/// Load a module through a caller-supplied factory (custom node kinds).
///
/// Installs a fresh prelude, chains the module frame to it, and builds
/// the program. The program is not executed; the driver owns the first
/// execution.
pub fn load_with(factory: &Factory, name: impl Into<String>, tree: &Node) -> EvalResult<Module> {
    let mut env = Environment::new();
    let prelude_scope = prelude::install(&mut env);
    let scope = env.push_scope(Some(prelude_scope));
    let program = factory.statement(tree, scope)?;
    Ok(Module {
        name: name.into(),
        program,
        env,
        scope,
    })
}
