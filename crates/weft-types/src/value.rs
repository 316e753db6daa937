//! Runtime values for the Weft execution core.
//!
//! `True` and `False` are not native booleans: they are [`Singleton`]
//! values minted once when the prelude is installed and bound by name.
//! Conditions compare against them by identity ([`Value::is`]), never by
//! truthiness coercion. Structural equality (`PartialEq`) is a separate
//! notion, used by changeset diffing.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// An identity-significant named value.
///
/// Two singletons with the same name are still distinct unless they are
/// literally the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Singleton {
    pub name: String,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Singleton(Rc<Singleton>),
    /// Structured kind with named members.
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Mint a fresh singleton. Each call produces a new identity.
    pub fn singleton(name: impl Into<String>) -> Value {
        Value::Singleton(Rc::new(Singleton { name: name.into() }))
    }

    /// Identity comparison.
    ///
    /// Only singletons have identity; everything else is `false` even
    /// when structurally equal (two equal numbers are distinct objects).
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Singleton(a), Value::Singleton(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Value kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Singleton(_) => "singleton",
            Value::Record(_) => "record",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Text(s) => write!(f, "{s}"),
            Value::Singleton(s) => write!(f, "{}", s.name),
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Manual impl: singletons serialize as their bound name.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Singleton(s) => serializer.serialize_str(&s.name),
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// A named slot in an environment frame.
///
/// `is_constant` hides the binding from user-facing state dumps; raw
/// change computation still sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub is_constant: bool,
}

impl Binding {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            is_constant: false,
        }
    }

    pub fn constant(value: Value) -> Self {
        Self {
            value,
            is_constant: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_identity() {
        let t = Value::singleton("True");
        let also_t = t.clone();
        let other_t = Value::singleton("True");

        assert!(t.is(&also_t), "clone keeps identity");
        assert!(!t.is(&other_t), "same name, distinct mint");
        // structural equality still holds by name
        assert_eq!(t, other_t);
    }

    #[test]
    fn numbers_have_no_identity() {
        let a = Value::Number(5.0);
        let b = Value::Number(5.0);
        assert!(!a.is(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("hi".into()).to_string(), "hi");
        assert_eq!(Value::singleton("True").to_string(), "True");

        let rec = Value::Record(BTreeMap::from([
            ("x".to_string(), Value::Number(5.0)),
            ("y".to_string(), Value::Number(2.0)),
        ]));
        assert_eq!(rec.to_string(), "{x: 5, y: 2}");
    }

    #[test]
    fn serialize_singleton_as_name() {
        let t = Value::singleton("True");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"True\"");

        let rec = Value::Record(BTreeMap::from([("n".to_string(), Value::Number(1.0))]));
        assert_eq!(serde_json::to_string(&rec).unwrap(), "{\"n\":1.0}");
    }
}
