//! Weft execution core.
//!
//! Turns parsed node trees into executable AST nodes bound to a scoped
//! environment, and runs them against an ephemeral per-step context:
//!
//! ```text
//! node tree → Factory → Expr/Stmt (bound to a ScopeId) → Module
//!                                    Module::execute(&mut Context)
//! ```
//!
//! The crate owns no scheduling and no observer protocol; see `weft-sim`
//! for the stepping and change-notification layer.

pub mod ast;
pub mod env;
pub mod error;
pub mod factory;
pub mod module;
pub mod prelude;

pub use ast::{Expr, ExprKind, ForeignFn, Stmt, StmtKind};
pub use env::{Environment, ScopeId};
pub use error::{EvalError, EvalResult};
pub use factory::Factory;
pub use module::{load, load_with, Context, Module};
