//! Scoped variable environment for the Weft execution core.
//!
//! Scopes are frames in an arena, addressed by [`ScopeId`] and chained
//! through a parent index (prelude → module scope). AST nodes hold the
//! `ScopeId` they were constructed against rather than a live reference,
//! which keeps snapshotting for change computation a plain frame clone.

use crate::error::{EvalError, EvalResult};
use std::collections::BTreeMap;
use weft_types::{Binding, Value};

/// Index of a scope frame in an [`Environment`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// A single scope frame.
///
/// `order` tracks local declaration order; `bindings` is the keyed store.
#[derive(Debug, Clone, Default)]
struct Frame {
    parent: Option<ScopeId>,
    order: Vec<String>,
    bindings: BTreeMap<String, Binding>,
}

/// Arena of chained scope frames.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an empty environment with no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new frame chained to `parent` (or a root frame).
    pub fn push_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.frames.len() as u32);
        self.frames.push(Frame {
            parent,
            ..Frame::default()
        });
        id
    }

    /// Parent of a scope, if any.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.frames[scope.0 as usize].parent
    }

    /// Look up a name, walking the parent chain outward.
    pub fn get(&self, scope: ScopeId, name: &str) -> EvalResult<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = &self.frames[id.0 as usize];
            if let Some(binding) = frame.bindings.get(name) {
                return Ok(&binding.value);
            }
            current = frame.parent;
        }
        Err(EvalError::NameError {
            name: name.to_string(),
        })
    }

    /// Write a name in the local frame only.
    ///
    /// Creates the binding when absent; never touches a parent frame, so
    /// a parent binding of the same name is shadowed, not mutated.
    pub fn set(&mut self, scope: ScopeId, name: &str, value: Value) {
        let frame = &mut self.frames[scope.0 as usize];
        match frame.bindings.get_mut(name) {
            Some(binding) => binding.value = value,
            None => {
                frame.order.push(name.to_string());
                frame.bindings.insert(name.to_string(), Binding::new(value));
            }
        }
    }

    /// Declare a binding in the local frame with an explicit constant flag.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: Value, constant: bool) {
        let frame = &mut self.frames[scope.0 as usize];
        let binding = if constant {
            Binding::constant(value)
        } else {
            Binding::new(value)
        };
        if frame.bindings.insert(name.to_string(), binding).is_none() {
            frame.order.push(name.to_string());
        }
    }

    /// Local names in declaration order. Parent-scope names are excluded.
    pub fn list(&self, scope: ScopeId) -> &[String] {
        &self.frames[scope.0 as usize].order
    }

    /// True when the name is bound in the local frame itself.
    pub fn is_local(&self, scope: ScopeId, name: &str) -> bool {
        self.frames[scope.0 as usize].bindings.contains_key(name)
    }

    /// Constant flag of a local binding (`false` when not locally bound).
    pub fn is_constant(&self, scope: ScopeId, name: &str) -> bool {
        self.frames[scope.0 as usize]
            .bindings
            .get(name)
            .map(|b| b.is_constant)
            .unwrap_or(false)
    }

    /// Clone the local frame's values for change computation.
    ///
    /// Constants are included — dump filtering is a presentation concern.
    pub fn snapshot(&self, scope: ScopeId) -> BTreeMap<String, Value> {
        self.frames[scope.0 as usize]
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_walks_parent_chain() {
        let mut env = Environment::new();
        let root = env.push_scope(None);
        let child = env.push_scope(Some(root));
        env.set(root, "x", Value::Number(1.0));

        assert_eq!(env.get(child, "x").unwrap(), &Value::Number(1.0));
    }

    #[test]
    fn set_shadows_without_mutating_parent() {
        let mut env = Environment::new();
        let root = env.push_scope(None);
        let child = env.push_scope(Some(root));
        env.set(root, "x", Value::Number(1.0));
        env.set(child, "x", Value::Number(2.0));

        assert_eq!(env.get(child, "x").unwrap(), &Value::Number(2.0));
        assert_eq!(env.get(root, "x").unwrap(), &Value::Number(1.0));
    }

    #[test]
    fn unbound_name_errors() {
        let mut env = Environment::new();
        let root = env.push_scope(None);
        assert_eq!(
            env.get(root, "missing"),
            Err(EvalError::NameError {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn list_is_local_and_ordered() {
        let mut env = Environment::new();
        let root = env.push_scope(None);
        let child = env.push_scope(Some(root));
        env.set(root, "inherited", Value::Number(0.0));
        env.set(child, "b", Value::Number(1.0));
        env.set(child, "a", Value::Number(2.0));
        env.set(child, "b", Value::Number(3.0)); // update keeps position

        assert_eq!(env.list(child), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn constants_flagged_but_snapshotted() {
        let mut env = Environment::new();
        let root = env.push_scope(None);
        env.declare(root, "True", Value::singleton("True"), true);
        env.set(root, "count", Value::Number(0.0));

        assert!(env.is_constant(root, "True"));
        assert!(!env.is_constant(root, "count"));
        let snap = env.snapshot(root);
        assert!(snap.contains_key("True"));
        assert!(snap.contains_key("count"));
    }
}
