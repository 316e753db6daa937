//! Shared types for the Weft runtime.
//!
//! This crate defines the node tree handed over by an external parser,
//! the runtime value union, source spans, and other data structures
//! shared between the execution core and the driving layer.

mod span;
pub mod node;
pub mod value;

pub use node::{Attr, Node};
pub use span::{SourceFile, Span};
pub use value::{Binding, Singleton, Value};
