//! Core object model: typed values over an order-preserving JSON tree.
//!
//! A [`Value`] wraps one node and tracks change state. Object-shaped values
//! own their members as [`Property`] entries in document order, each of
//! which is materialized into a typed value on first access.

mod property;
mod value;
mod variant;

pub use property::Property;
pub use value::Value;
pub use variant::{ListForm, ObjectKind, Variant};

/// Tree node: an insertion-ordered JSON value.
pub type Node = serde_json::Value;

/// Returns a short name for the shape of a node.
#[must_use]
pub fn kind_name(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "boolean",
        Node::Number(_) => "number",
        Node::String(_) => "string",
        Node::Array(_) => "array",
        Node::Object(_) => "object",
    }
}
