//! Prelude scope installation.
//!
//! The prelude frame is the root of every module's scope chain and the
//! only place the `True`/`False` singletons are minted. All identity
//! comparisons against `True` resolve here through the chain.

use crate::env::{Environment, ScopeId};
use weft_types::Value;

/// Install the prelude frame and return its scope.
///
/// Bindings are constant: hidden from user-facing dumps, visible to raw
/// change computation.
pub fn install(env: &mut Environment) -> ScopeId {
    let scope = env.push_scope(None);
    env.declare(scope, "True", Value::singleton("True"), true);
    env.declare(scope, "False", Value::singleton("False"), true);
    scope
}
