//! Typed wrapper over one tree node.

use super::{Node, Property, Variant, kind_name};
use crate::error::{ModelError, ModelResult};
use crate::model::factory::Factory;
use crate::model::overrides;
use crate::model::registry::{self, types};

/// Content of a value: a scalar or array node, or the members of an object.
#[derive(Debug)]
pub(crate) enum Body {
    Leaf(Node),
    Object(Vec<Property>),
}

impl Body {
    /// Splits an object node into unresolved members.
    pub(crate) fn from_node(node: Node, element_type: Option<&str>) -> Self {
        match node {
            Node::Object(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(name, node)| Property::raw(name, node, element_type.map(str::to_string)))
                    .collect(),
            ),
            other => Self::Leaf(other),
        }
    }

    fn to_node(&self) -> Node {
        match self {
            Self::Leaf(node) => node.clone(),
            Self::Object(props) => Node::Object(
                props
                    .iter()
                    .map(|p| (p.name().to_string(), p.to_node()))
                    .collect(),
            ),
        }
    }
}

/// A typed value over one node.
///
/// The type name is fixed at construction; it is not re-derived from the
/// node. Structural changes go through the property operations, which keep
/// the change flags accurate for patch generation.
#[derive(Debug)]
pub struct Value {
    type_name: String,
    pub(crate) variant: Variant,
    pub(crate) body: Body,
    /// This value's own content was replaced, or a member added or removed.
    pub(crate) changed: bool,
    /// Synthesized by the override engine; never emitted as a patch.
    override_generated: bool,
    /// Name of the property holding this value, for upward navigation only.
    pub(crate) parent_property: Option<String>,
}

fn not_an_object(type_name: &str, op: &str) -> ModelError {
    ModelError::NotAnObject(format!("{op} on {type_name} value"))
}

fn wrong_kind(name: &str, expected: &'static str, found: &Node) -> ModelError {
    ModelError::WrongKind {
        name: name.to_string(),
        expected,
        found: kind_name(found),
    }
}

impl Value {
    pub(crate) fn wrap(type_name: impl Into<String>, variant: Variant, node: Node) -> Self {
        let body = match &variant {
            Variant::Map { element } => Body::from_node(node, Some(element)),
            _ => Body::from_node(node, None),
        };
        Self {
            type_name: type_name.into(),
            variant,
            body,
            changed: false,
            override_generated: false,
            parent_property: None,
        }
    }

    /// Creates a generic value of the given type.
    #[must_use]
    pub fn new(type_name: impl Into<String>, node: Node) -> Self {
        Self::wrap(type_name, Variant::Generic, node)
    }

    #[must_use]
    pub fn string(val: impl Into<String>) -> Self {
        Self::new(types::STRING, Node::String(val.into()))
    }

    #[must_use]
    pub fn boolean(val: bool) -> Self {
        Self::new(types::BOOLEAN, Node::Bool(val))
    }

    #[must_use]
    pub fn unsigned(val: u32) -> Self {
        Self::new(types::UNSIGNED_INT, Node::from(val))
    }

    /// Creates an explicit deletion marker.
    #[must_use]
    pub fn null() -> Self {
        Self::wrap(types::NULL, Variant::Null, Node::Null)
    }

    /// Returns the type passed at construction.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.body, Body::Object(_))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.body, Body::Leaf(Node::Null))
    }

    /// Returns whether this value's own content was changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Returns whether this value or any materialized member was changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changed
            || match &self.body {
                Body::Object(props) => props.iter().any(Property::has_changes),
                Body::Leaf(_) => false,
            }
    }

    #[must_use]
    pub fn override_generated(&self) -> bool {
        self.override_generated
    }

    /// Flags this value as synthesized for an override.
    pub fn mark_override_generated(&mut self) {
        self.override_generated = true;
    }

    /// Returns the name of the property containing this value.
    #[must_use]
    pub fn parent_property(&self) -> Option<&str> {
        self.parent_property.as_deref()
    }

    /// Returns the node of a scalar or array value.
    #[must_use]
    pub fn leaf(&self) -> Option<&Node> {
        match &self.body {
            Body::Leaf(node) => Some(node),
            Body::Object(_) => None,
        }
    }

    pub(crate) fn leaf_mut(&mut self) -> Option<&mut Node> {
        match &mut self.body {
            Body::Leaf(node) => Some(node),
            Body::Object(_) => None,
        }
    }

    /// Replaces the whole content of this value. The new content is the
    /// caller's, so the value is no longer override-generated.
    pub fn set_node(&mut self, node: Node) {
        let element_type = match &self.variant {
            Variant::Map { element } => Some(element.as_str()),
            _ => None,
        };
        self.body = Body::from_node(node, element_type);
        self.changed = true;
        self.override_generated = false;
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// ## Summary
    /// Returns all members, in document order.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped.
    pub fn properties(&self) -> ModelResult<&[Property]> {
        match &self.body {
            Body::Object(props) => Ok(props),
            Body::Leaf(_) => Err(not_an_object(&self.type_name, "properties")),
        }
    }

    /// ## Summary
    /// Mutable access to all members, in document order.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped.
    pub fn properties_mut(&mut self) -> ModelResult<&mut [Property]> {
        match &mut self.body {
            Body::Object(props) => Ok(props),
            Body::Leaf(_) => Err(not_an_object(&self.type_name, "properties")),
        }
    }

    /// ## Summary
    /// Returns the member names, in document order.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped.
    pub fn property_names(&self) -> ModelResult<Vec<&str>> {
        Ok(self.properties()?.iter().map(Property::name).collect())
    }

    /// Returns whether this is an object holding the named member.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties()
            .is_ok_and(|props| props.iter().any(|p| p.name() == name))
    }

    /// ## Summary
    /// Returns the named member, or `None` if absent.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped.
    pub fn property(&mut self, name: &str) -> ModelResult<Option<&mut Property>> {
        Ok(self.properties_mut()?.iter_mut().find(|p| p.name() == name))
    }

    /// ## Summary
    /// Returns the materialized value of the named member, or `None` if absent.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped, or a
    /// resolution error from the factory.
    pub fn property_value(&mut self, name: &str) -> ModelResult<Option<&mut Value>> {
        match self.property(name)? {
            Some(prop) => prop.value().map(Some),
            None => Ok(None),
        }
    }

    /// ## Summary
    /// Adds or replaces the named member. A replaced member keeps its
    /// position. Marks this value and the new member's value as changed.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped, and
    /// `ImmutableProperty` for an immutable name on an override.
    pub fn set_property(&mut self, prop: Property) -> ModelResult<&mut Property> {
        self.guard_immutable(prop.name())?;
        self.insert_property(prop)
    }

    /// `set_property` without the override guard, for the engine itself.
    pub(crate) fn insert_property(&mut self, mut prop: Property) -> ModelResult<&mut Property> {
        let Body::Object(props) = &mut self.body else {
            return Err(not_an_object(&self.type_name, "set_property"));
        };

        prop.mark_changed();
        self.changed = true;

        let index = if let Some(index) = props.iter().position(|p| p.name() == prop.name()) {
            props[index] = prop;
            index
        } else {
            props.push(prop);
            props.len() - 1
        };

        Ok(&mut props[index])
    }

    /// ## Summary
    /// Removes the named member if present. Marks this value as changed
    /// only when something was removed.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped, and
    /// `ImmutableProperty` for an immutable name on an override.
    pub fn remove_property(&mut self, name: &str) -> ModelResult<Option<Property>> {
        self.guard_immutable(name)?;
        let removed = self.take_property(name)?;

        if removed.is_some()
            && let Variant::Override(state) = &mut self.variant
        {
            state.record_deletion(name);
        }

        Ok(removed)
    }

    /// `remove_property` without the override guard.
    pub(crate) fn take_property(&mut self, name: &str) -> ModelResult<Option<Property>> {
        let Body::Object(props) = &mut self.body else {
            return Err(not_an_object(&self.type_name, "remove_property"));
        };

        let removed = props
            .iter()
            .position(|p| p.name() == name)
            .map(|index| props.remove(index));
        if removed.is_some() {
            self.changed = true;
        }

        Ok(removed)
    }

    /// ## Summary
    /// Removes every member.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped.
    pub fn clear(&mut self) -> ModelResult<()> {
        let Body::Object(props) = &mut self.body else {
            return Err(not_an_object(&self.type_name, "clear"));
        };
        if !props.is_empty() {
            props.clear();
            self.changed = true;
        }
        Ok(())
    }

    /// ## Summary
    /// Returns the value of the named member, creating an empty one of the
    /// registered type when absent and `create` is set.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this value is not object-shaped, and `Type`
    /// if the member must be created but has no single registered type.
    pub fn value_for(&mut self, name: &str, create: bool) -> ModelResult<Option<&mut Value>> {
        if !self.has_property(name) {
            if !create {
                return Ok(None);
            }
            let value = Factory::global().new_property_value(name)?;
            self.set_property(Property::new(name, value))?;
        }

        self.property_value(name)
    }

    /// Builds a materialized member over `node`, typed as a map element when
    /// this value is a map.
    pub(crate) fn member(&self, name: &str, node: Node) -> ModelResult<Property> {
        let element_type = match &self.variant {
            Variant::Map { element } => Some(element.clone()),
            _ => None,
        };
        let mut prop = Property::raw(name.to_string(), node, element_type);
        prop.value()?;
        Ok(prop)
    }

    fn guard_immutable(&self, name: &str) -> ModelResult<()> {
        if matches!(self.variant, Variant::Override(_)) && registry::is_immutable(name) {
            return Err(ModelError::ImmutableProperty(name.to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scalar members
    // ------------------------------------------------------------------

    fn scalar_member(&self, name: &str) -> ModelResult<Option<&Node>> {
        let props = self.properties()?;
        let Some(prop) = props.iter().find(|p| p.name() == name) else {
            return Ok(None);
        };

        match prop.scalar() {
            Some(Node::Null) => Ok(None),
            Some(node) => Ok(Some(node)),
            None => Err(ModelError::WrongKind {
                name: name.to_string(),
                expected: "scalar",
                found: "object",
            }),
        }
    }

    /// ## Summary
    /// Returns the named string member.
    ///
    /// ## Errors
    /// Returns `NotAnObject` on a non-object value, `WrongKind` if the member
    /// is not a string.
    pub fn string_property(&self, name: &str) -> ModelResult<Option<&str>> {
        match self.scalar_member(name)? {
            None => Ok(None),
            Some(Node::String(s)) => Ok(Some(s)),
            Some(other) => Err(wrong_kind(name, "string", other)),
        }
    }

    /// ## Summary
    /// Returns the named boolean member, `false` when absent.
    ///
    /// ## Errors
    /// Returns `NotAnObject` on a non-object value, `WrongKind` if the member
    /// is not a boolean.
    pub fn boolean_property(&self, name: &str) -> ModelResult<bool> {
        match self.scalar_member(name)? {
            None => Ok(false),
            Some(Node::Bool(b)) => Ok(*b),
            Some(other) => Err(wrong_kind(name, "boolean", other)),
        }
    }

    /// ## Summary
    /// Returns the named unsigned integer member.
    ///
    /// ## Errors
    /// Returns `NotAnObject` on a non-object value, `WrongKind` if the member
    /// is not an integer in the unsigned 32-bit range.
    pub fn unsigned_property(&self, name: &str) -> ModelResult<Option<u32>> {
        match self.scalar_member(name)? {
            None => Ok(None),
            Some(node) => node
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| wrong_kind(name, "unsigned integer", node)),
        }
    }

    /// ## Summary
    /// Writes a string member through to its node.
    ///
    /// ## Errors
    /// See [`Value::set_scalar_property`].
    pub fn set_string_property(&mut self, name: &str, val: impl Into<String>) -> ModelResult<()> {
        self.set_scalar_property(name, Node::String(val.into()))
    }

    /// ## Summary
    /// Writes a boolean member through to its node.
    ///
    /// ## Errors
    /// See [`Value::set_scalar_property`].
    pub fn set_boolean_property(&mut self, name: &str, val: bool) -> ModelResult<()> {
        self.set_scalar_property(name, Node::Bool(val))
    }

    /// ## Summary
    /// Writes an unsigned integer member through to its node.
    ///
    /// ## Errors
    /// See [`Value::set_scalar_property`].
    pub fn set_unsigned_property(&mut self, name: &str, val: u32) -> ModelResult<()> {
        self.set_scalar_property(name, Node::from(val))
    }

    /// ## Summary
    /// Writes a scalar member. An existing member has its node replaced in
    /// place and only that member is marked changed; an absent member is
    /// added, which marks this value changed as well.
    ///
    /// ## Errors
    /// Returns `NotAnObject` on a non-object value, `ImmutableProperty` for an
    /// immutable name on an override, or a resolution error for a new member.
    pub fn set_scalar_property(&mut self, name: &str, node: Node) -> ModelResult<()> {
        self.guard_immutable(name)?;

        if let Some(prop) = self.property(name)? {
            prop.value()?.set_node(node);
            return Ok(());
        }

        let prop = Factory::global().make_property(name, Some(node))?;
        self.insert_property(prop)?;
        Ok(())
    }

    /// ## Summary
    /// Returns this value as a string.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the node is not a string.
    pub fn string_value(&self) -> ModelResult<&str> {
        match &self.body {
            Body::Leaf(Node::String(s)) => Ok(s),
            Body::Leaf(other) => Err(wrong_kind(&self.type_name, "string", other)),
            Body::Object(_) => Err(ModelError::WrongKind {
                name: self.type_name.clone(),
                expected: "string",
                found: "object",
            }),
        }
    }

    /// ## Summary
    /// Returns this value as a boolean.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the node is not a boolean.
    pub fn boolean_value(&self) -> ModelResult<bool> {
        match &self.body {
            Body::Leaf(Node::Bool(b)) => Ok(*b),
            Body::Leaf(other) => Err(wrong_kind(&self.type_name, "boolean", other)),
            Body::Object(_) => Err(ModelError::WrongKind {
                name: self.type_name.clone(),
                expected: "boolean",
                found: "object",
            }),
        }
    }

    // ------------------------------------------------------------------
    // Copy and output
    // ------------------------------------------------------------------

    /// Returns the serialized form of this value.
    ///
    /// A bound override serializes as its patch object, not as the
    /// materialized occurrence.
    #[must_use]
    pub fn to_node(&self) -> Node {
        if let Variant::Override(state) = &self.variant
            && let Some(delta) = state.delta()
        {
            return delta.to_node();
        }
        self.body.to_node()
    }

    /// Returns the node of the content itself, ignoring override deltas.
    pub(crate) fn content_node(&self) -> Node {
        self.body.to_node()
    }

    /// Returns a value of the same variant over a deep copy of the node.
    /// The copy starts with clean change flags and no parent.
    #[must_use]
    pub fn copy(&self) -> Value {
        Value::wrap(self.type_name.clone(), self.variant.detached(), self.to_node())
    }

    /// ## Summary
    /// Prepares this value and everything below it for output. Overrides
    /// regenerate their patch objects here.
    ///
    /// ## Errors
    /// Returns the first error raised while generating patches.
    pub fn pre_write(&mut self) -> ModelResult<()> {
        if matches!(self.variant, Variant::Override(_)) {
            overrides::write_patches(self)?;
        }

        if let Body::Object(props) = &mut self.body {
            for value in props.iter_mut().filter_map(Property::resolved_mut) {
                value.pre_write()?;
            }
        }

        Ok(())
    }

    /// ## Summary
    /// Runs [`Value::pre_write`] and returns the node to hand to a writer.
    ///
    /// ## Errors
    /// Same as [`Value::pre_write`].
    pub fn write_node(&mut self) -> ModelResult<Node> {
        self.pre_write()?;
        Ok(self.to_node())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::registry::names;

    fn location() -> Value {
        Value::wrap(
            types::LOCATION,
            Variant::TypedObject,
            json!({"@type": "Location", "name": "Room 1", "description": "Main"}),
        )
    }

    #[test]
    fn object_operations_require_object() {
        let mut value = Value::string("x");
        assert!(matches!(value.properties(), Err(ModelError::NotAnObject(_))));
        assert!(matches!(value.property("a"), Err(ModelError::NotAnObject(_))));
        assert!(matches!(
            value.set_property(Property::new("a", Value::string("b"))),
            Err(ModelError::NotAnObject(_))
        ));
        assert!(!value.has_property("a"));
    }

    #[test]
    fn set_property_replaces_in_place() {
        let mut loc = location();
        loc.set_property(Property::new(names::NAME, Value::string("Room 2")))
            .expect("set works");

        assert_eq!(
            loc.property_names().expect("object"),
            vec!["@type", "name", "description"]
        );
        assert_eq!(loc.string_property(names::NAME).expect("string"), Some("Room 2"));
        assert!(loc.changed());
    }

    #[test]
    fn remove_marks_changed_only_when_present() {
        let mut loc = location();
        assert!(loc.remove_property("missing").expect("object").is_none());
        assert!(!loc.changed());

        assert!(loc.remove_property(names::DESCRIPTION).expect("object").is_some());
        assert!(loc.changed());
        assert!(!loc.has_property(names::DESCRIPTION));
    }

    #[test]
    fn scalar_write_through_marks_member_only() {
        let mut loc = location();
        loc.set_string_property(names::NAME, "Room 3").expect("set works");

        assert!(!loc.changed());
        assert!(loc.has_changes());
        let name = loc.property_value(names::NAME).expect("object").expect("present");
        assert!(name.changed());
        assert_eq!(name.string_value().expect("string"), "Room 3");
    }

    #[test]
    fn caller_writes_clear_override_generated() {
        let mut loc = location();
        let name = loc.property_value(names::NAME).expect("object").expect("present");
        name.mark_override_generated();

        loc.set_string_property(names::NAME, "Room 4").expect("set works");
        let name = loc.property_value(names::NAME).expect("object").expect("present");
        assert!(!name.override_generated());
        assert!(name.changed());
    }

    #[test]
    fn scalar_add_marks_container() {
        let mut loc = location();
        loc.set_string_property(names::COORDINATES, "geo:40.7654,73.9876")
            .expect("set works");
        assert!(loc.changed());
    }

    #[test]
    fn scalar_kind_mismatch() {
        let loc = location();
        assert!(matches!(
            loc.boolean_property(names::NAME),
            Err(ModelError::WrongKind { expected: "boolean", found: "string", .. })
        ));
        assert!(!loc.boolean_property(names::EXPECT_REPLY).expect("absent is false"));
        assert_eq!(loc.unsigned_property(names::SIZE).expect("absent"), None);
    }

    #[test]
    fn copy_shares_nothing() {
        let mut original = location();
        let mut copy = original.copy();
        assert_eq!(copy.to_node(), original.to_node());
        assert_eq!(copy.type_name(), types::LOCATION);
        assert!(!copy.has_changes());

        copy.set_string_property(names::NAME, "Elsewhere").expect("set works");
        assert_eq!(original.string_property(names::NAME).expect("string"), Some("Room 1"));

        original.remove_property(names::DESCRIPTION).expect("object");
        assert_eq!(copy.string_property(names::DESCRIPTION).expect("string"), Some("Main"));
    }

    #[test]
    fn has_changes_ignores_unresolved_members() {
        let mut loc = location();
        loc.property(names::NAME).expect("object").expect("present");
        assert!(!loc.has_changes());
        loc.property_value(names::NAME).expect("object").expect("present");
        assert!(!loc.has_changes());
    }

    #[test]
    fn value_for_creates_registered_type() {
        let mut loc = location();
        assert!(loc.value_for(names::LOCATION_TYPES, false).expect("object").is_none());

        let types_value = loc
            .value_for(names::LOCATION_TYPES, true)
            .expect("object")
            .expect("created");
        assert_eq!(types_value.type_name(), "String[Boolean]");
        assert!(loc.has_property(names::LOCATION_TYPES));

        assert!(matches!(
            loc.value_for("summary", true),
            Err(ModelError::Type(_))
        ));
    }

    #[test]
    fn order_is_preserved_on_output() {
        let node = json!({"z": 1, "a": 2, "m": {"y": true, "b": false}});
        let mut value = Value::new(types::UNKNOWN, node.clone());
        value.property_value("m").expect("object");
        assert_eq!(
            serde_json::to_string(&value.to_node()).expect("serializes"),
            serde_json::to_string(&node).expect("serializes")
        );
    }
}
