//! Named members of an object-shaped value.

use jscal_core::error::CoreError;

use super::{Node, Value};
use crate::error::ModelResult;
use crate::model::factory::Factory;

const UNMATERIALIZED: &str = "property slot still raw after materialization";

/// A (name, value) pair owned by an object-shaped [`Value`].
///
/// The value is materialized lazily: a property read from a document keeps
/// its node untouched until the first call to [`Property::value`], which
/// resolves the type through the registry and factory.
#[derive(Debug)]
pub struct Property {
    name: String,
    slot: Slot,
    /// Element type assigned by the owning collection, if any.
    element_type: Option<String>,
}

#[derive(Debug)]
enum Slot {
    Raw(Node),
    Value(Value),
}

impl Property {
    /// Wraps an already constructed value.
    #[must_use]
    pub fn new(name: impl Into<String>, mut value: Value) -> Self {
        let name = name.into();
        value.parent_property = Some(name.clone());
        Self {
            name,
            slot: Slot::Value(value),
            element_type: None,
        }
    }

    /// Wraps a node that has not been resolved yet.
    pub(crate) fn raw(name: String, node: Node, element_type: Option<String>) -> Self {
        Self {
            name,
            slot: Slot::Raw(node),
            element_type,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the value has been materialized.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.slot, Slot::Value(_))
    }

    /// Returns the value if it has been materialized.
    #[must_use]
    pub fn resolved(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Value(value) => Some(value),
            Slot::Raw(_) => None,
        }
    }

    pub(crate) fn resolved_mut(&mut self) -> Option<&mut Value> {
        match &mut self.slot {
            Slot::Value(value) => Some(value),
            Slot::Raw(_) => None,
        }
    }

    /// ## Summary
    /// Returns the typed value, materializing it on first access.
    ///
    /// ## Errors
    /// Returns an error if the type cannot be resolved or the factory
    /// rejects the node. Type resolution failures leave the node in place.
    pub fn value(&mut self) -> ModelResult<&mut Value> {
        if let Slot::Raw(node) = &mut self.slot {
            let mut value =
                Factory::global().materialize(&self.name, self.element_type.as_deref(), node)?;
            value.parent_property = Some(self.name.clone());
            self.slot = Slot::Value(value);
        }

        match &mut self.slot {
            Slot::Value(value) => Ok(value),
            Slot::Raw(_) => Err(CoreError::InvariantViolation(UNMATERIALIZED).into()),
        }
    }

    /// ## Summary
    /// Consumes the property, returning its materialized value.
    ///
    /// ## Errors
    /// Same as [`Property::value`].
    pub fn into_value(mut self) -> ModelResult<Value> {
        self.value()?;
        match self.slot {
            Slot::Value(value) => Ok(value),
            Slot::Raw(_) => Err(CoreError::InvariantViolation(UNMATERIALIZED).into()),
        }
    }

    /// Returns the node of a scalar member without materializing it.
    ///
    /// Object-shaped members return `None`.
    #[must_use]
    pub fn scalar(&self) -> Option<&Node> {
        match &self.slot {
            Slot::Raw(node) if !node.is_object() => Some(node),
            Slot::Raw(_) => None,
            Slot::Value(value) => value.leaf(),
        }
    }

    /// Returns whether this is an explicit deletion marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.scalar().is_some_and(Node::is_null)
    }

    /// Returns a deep copy of the current content as a node.
    #[must_use]
    pub fn to_node(&self) -> Node {
        match &self.slot {
            Slot::Raw(node) => node.clone(),
            Slot::Value(value) => value.to_node(),
        }
    }

    /// Returns whether the value, or anything below it, was changed.
    /// Unmaterialized members cannot have changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.resolved().is_some_and(Value::has_changes)
    }

    /// Returns a property with the same name over a deep copy of the value.
    #[must_use]
    pub fn copy(&self) -> Self {
        match &self.slot {
            Slot::Raw(node) => {
                Self::raw(self.name.clone(), node.clone(), self.element_type.clone())
            }
            Slot::Value(value) => Self::new(self.name.clone(), value.copy()),
        }
    }

    /// Marks a freshly set value as changed. Raw members are left alone.
    pub(crate) fn mark_changed(&mut self) {
        if let Slot::Value(value) = &mut self.slot {
            value.changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::registry::types;

    #[test]
    fn lazy_materialization() {
        let mut prop = Property::raw("title".to_string(), json!("Standup"), None);
        assert!(!prop.is_resolved());
        assert_eq!(prop.scalar(), Some(&json!("Standup")));

        let value = prop.value().expect("title resolves");
        assert_eq!(value.type_name(), types::STRING);
        assert_eq!(value.parent_property(), Some("title"));
        assert!(prop.is_resolved());
        assert!(!prop.has_changes());
    }

    #[test]
    fn failed_resolution_keeps_node() {
        let mut prop = Property::raw("trigger".to_string(), json!({"offset": "-PT5M"}), None);
        assert!(prop.value().is_err());
        assert_eq!(prop.to_node(), json!({"offset": "-PT5M"}));
    }

    #[test]
    fn element_type_overrides_name_lookup() {
        let mut prop = Property::raw(
            "2024-01-08T09:00:00".to_string(),
            json!({"title": "x"}),
            Some(types::PATCH_OBJECT.to_string()),
        );
        let value = prop.value().expect("override resolves");
        assert_eq!(value.type_name(), types::PATCH_OBJECT);
    }

    #[test]
    fn null_marker() {
        let prop = Property::raw("description".to_string(), Node::Null, None);
        assert!(prop.is_null());
    }
}
