//! Changeset computation between environment snapshots.
//!
//! A changeset is the minimal description of what an execution did to
//! the observed scope: one entry per binding whose value differs from
//! the prior snapshot. Constants are not filtered here — hiding them is
//! a presentation concern of user-facing dumps.

use serde::Serialize;
use std::collections::BTreeMap;
use weft_types::Value;

/// One changed binding. `old` is absent for a created binding, `new`
/// for a removed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

/// An ordered list of changed bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Changeset {
    pub changes: Vec<Change>,
}

impl Changeset {
    /// Diff two snapshots of the observed scope.
    ///
    /// `order` is the scope's declaration order and fixes the order of
    /// surviving entries; removed bindings follow in `before` order.
    pub fn diff(
        before: &BTreeMap<String, Value>,
        order: &[String],
        after: &BTreeMap<String, Value>,
    ) -> Self {
        let mut changes = Vec::new();
        for name in order {
            let old = before.get(name);
            let new = after.get(name);
            if old != new {
                changes.push(Change {
                    name: name.clone(),
                    old: old.cloned(),
                    new: new.cloned(),
                });
            }
        }
        for (name, old) in before {
            if !after.contains_key(name) {
                changes.push(Change {
                    name: name.clone(),
                    old: Some(old.clone()),
                    new: None,
                });
            }
        }
        Changeset { changes }
    }

    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed bindings.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Look up a change by binding name.
    pub fn get(&self, name: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.name == name)
    }

    /// Serialize to compact JSON for host consumption.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
