//! Runtime error types for the Weft execution core.
//!
//! Errors are never caught inside `evaluate`/`execute`; they propagate
//! to the step or ad hoc caller, which surfaces them to the host.

use thiserror::Error;

/// Execution error — construction failures and runtime faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Name unbound anywhere along the scope chain.
    #[error("name '{name}' is not bound")]
    NameError { name: String },

    /// Factory dispatch miss.
    #[error("unknown node type '{tag}'")]
    UnknownNodeType { tag: String },

    /// Node missing a required attribute for its tag.
    #[error("malformed '{tag}' node: missing attribute '{field}'")]
    MalformedNode { tag: String, field: String },

    /// Member lookup on a record that lacks the member.
    #[error("record has no member '{child}'")]
    LookupError { child: String },

    /// Operation applied to the wrong kind of value.
    #[error("type error: {0}")]
    TypeError(String),

    /// Division by zero, non-finite result, etc.
    #[error("arithmetic error: {0}")]
    ArithmeticError(String),
}

/// Result alias for execution core operations.
pub type EvalResult<T> = Result<T, EvalError>;
