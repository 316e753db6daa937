//! Parsed node trees — the input contract of the execution core.
//!
//! An external parser turns model source text into a tree of [`Node`]s.
//! Each node carries a discriminant `tag` plus tag-specific attributes
//! (an `ifelse` node carries `condition`/`thenblock`/`elseblock`, a
//! `lookup` node carries `parent`/`child`, and so on). The factory in
//! `weft-eval` dispatches on the tag to build executable AST nodes.
//!
//! Trees serialize as JSON so out-of-process parsers can hand them over
//! the host boundary. The builder methods exist for hosts and tests that
//! assemble trees in Rust directly.

use crate::Span;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single parsed node: discriminant tag + named attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Span::is_unknown")]
    pub span: Span,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, Attr>,
}

/// An attribute value on a [`Node`].
///
/// Untagged in JSON: `true`, `1.5`, `"count"`, `{...}` (a child node),
/// `[...]` (a list of child nodes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attr {
    Bool(bool),
    Number(f64),
    Text(String),
    Node(Box<Node>),
    List(Vec<Node>),
}

impl Node {
    /// Create a node with no attributes and an unknown span.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            span: Span::default(),
            attrs: BTreeMap::new(),
        }
    }

    // ── Builders ─────────────────────────────────────────────────────────

    /// Attach a source span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), Attr::Text(value.into()));
        self
    }

    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attrs.insert(key.into(), Attr::Number(value));
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.attrs.insert(key.into(), Attr::Bool(value));
        self
    }

    pub fn with_child(mut self, key: impl Into<String>, child: Node) -> Self {
        self.attrs.insert(key.into(), Attr::Node(Box::new(child)));
        self
    }

    pub fn with_list(mut self, key: impl Into<String>, children: Vec<Node>) -> Self {
        self.attrs.insert(key.into(), Attr::List(children));
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Text attribute, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.attrs.get(key) {
            Some(Attr::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric attribute, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.attrs.get(key) {
            Some(Attr::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean attribute, if present and boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.attrs.get(key) {
            Some(Attr::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Child node attribute, if present and a single node.
    pub fn child(&self, key: &str) -> Option<&Node> {
        match self.attrs.get(key) {
            Some(Attr::Node(n)) => Some(n),
            _ => None,
        }
    }

    /// Node list attribute, if present and a list.
    pub fn list(&self, key: &str) -> Option<&[Node]> {
        match self.attrs.get(key) {
            Some(Attr::List(nodes)) => Some(nodes),
            _ => None,
        }
    }

    // ── JSON ─────────────────────────────────────────────────────────────

    /// Parse a node tree from JSON (the external parser hand-over format).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_accessors() {
        let node = Node::new("vardecl")
            .with_text("id", "count")
            .with_flag("constant", false)
            .with_child("value", Node::new("number").with_number("value", 0.0));

        assert_eq!(node.tag, "vardecl");
        assert_eq!(node.text("id"), Some("count"));
        assert_eq!(node.flag("constant"), Some(false));
        assert_eq!(node.child("value").map(|n| n.tag.as_str()), Some("number"));
        assert_eq!(node.text("missing"), None);
        // wrong attribute kind
        assert_eq!(node.number("id"), None);
    }

    #[test]
    fn json_round_trip() {
        let node = Node::new("ifelse")
            .at(Span::new(3, 1, 5, 2))
            .with_child("condition", Node::new("id").with_text("name", "True"))
            .with_child(
                "thenblock",
                Node::new("sequence").with_list("statements", vec![]),
            );
        let json = node.to_json();
        let back = Node::from_json(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn from_external_json() {
        // Shape an out-of-process parser would emit.
        let json = r#"{
            "tag": "assign",
            "attrs": {
                "id": "count",
                "value": {"tag": "number", "attrs": {"value": 3}}
            }
        }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node.tag, "assign");
        assert_eq!(node.text("id"), Some("count"));
        assert_eq!(
            node.child("value").and_then(|n| n.number("value")),
            Some(3.0)
        );
        assert!(node.span.is_unknown());
    }
}
