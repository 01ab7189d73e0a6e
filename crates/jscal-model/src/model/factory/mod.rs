//! Type resolution and value construction.
//!
//! Resolution maps a (property name, node) pair to a type name through the
//! registry, falling back to the node's own discriminator. Construction maps
//! a type name to a value, delegating to a specialized [`ValueFactory`] when
//! the registry names one. Specialized factories are built on first use and
//! cached for the lifetime of the process.

mod builtin;

use std::sync::OnceLock;

use crate::error::{ModelError, ModelResult};
use crate::model::core::{Node, ObjectKind, Property, Value, kind_name};
use crate::model::registry::{self, FactoryId, names, types};

/// Builds values for one family of types.
pub trait ValueFactory: Send + Sync + std::fmt::Debug {
    /// ## Summary
    /// Validates a node before it is handed over to [`ValueFactory::new_value`].
    ///
    /// ## Errors
    /// Returns an error if the node cannot represent `type_name`.
    fn check(&self, _type_name: &str, _node: &Node) -> ModelResult<()> {
        Ok(())
    }

    /// ## Summary
    /// Builds a value of `type_name` over `node`, or a fresh empty value when
    /// no node is given.
    ///
    /// ## Errors
    /// Returns an error if the node has the wrong shape for the type.
    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value>;
}

type Constructor = fn(FactoryId) -> Result<Box<dyn ValueFactory>, String>;

/// Resolves types and instantiates values.
#[derive(Debug)]
pub struct Factory {
    constructor: Constructor,
    /// One slot per factory id; a failed construction is cached too.
    cache: [OnceLock<Result<Box<dyn ValueFactory>, String>>; FactoryId::COUNT],
}

static GLOBAL: Factory = Factory::with_constructor(builtin::construct);

impl Factory {
    pub(crate) const fn with_constructor(constructor: Constructor) -> Self {
        Self {
            constructor,
            cache: [const { OnceLock::new() }; FactoryId::COUNT],
        }
    }

    /// Returns the process-wide factory.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// ## Summary
    /// Returns the specialized factory for `id`, constructing it on first use.
    ///
    /// ## Errors
    /// Returns `FactoryInit` if construction failed, now or on an earlier call.
    pub fn value_factory(&self, id: FactoryId) -> ModelResult<&dyn ValueFactory> {
        let slot = self.cache[id.index()].get_or_init(|| {
            tracing::debug!(factory = %id, "Instantiating value factory");
            (self.constructor)(id)
        });

        match slot {
            Ok(factory) => Ok(factory.as_ref()),
            Err(reason) => Err(ModelError::FactoryInit {
                factory: id.as_str(),
                reason: reason.clone(),
            }),
        }
    }

    /// ## Summary
    /// Returns the discriminator of an object node.
    ///
    /// ## Errors
    /// Returns `Type` if the node is not an object or has no textual
    /// discriminator.
    pub fn discriminator<'n>(node: &'n Node) -> ModelResult<&'n str> {
        let Node::Object(members) = node else {
            return Err(ModelError::Type(format!(
                "expected an object, found {}",
                kind_name(node)
            )));
        };

        members
            .get(names::TYPE)
            .and_then(Node::as_str)
            .ok_or_else(|| ModelError::Type(format!("missing or non-textual {}", names::TYPE)))
    }

    /// ## Summary
    /// Builds the calendar object described by a top-level node.
    ///
    /// ## Errors
    /// Returns `Type` for a missing discriminator and `UnsupportedType` for
    /// anything other than Event, Task or Group.
    pub fn make_calendar_object(&self, node: Node) -> ModelResult<Value> {
        let type_name = Self::discriminator(&node)?.to_string();
        ObjectKind::from_type(&type_name)?;
        self.instantiate_value(&type_name, Some(node))
    }

    /// ## Summary
    /// Determines the type of a member from its name and node.
    ///
    /// A null node is always the deletion marker. Unregistered names use the
    /// node's discriminator, or `unknown` when there is none. A registered
    /// name with one type uses it unconditionally; with several, the node's
    /// discriminator must pick one of them.
    ///
    /// ## Errors
    /// Returns `Type` if the type cannot be determined and `InvalidType` if
    /// the discriminator is not allowed for the property.
    pub fn resolve_property_type(name: &str, node: Option<&Node>) -> ModelResult<String> {
        if node.is_some_and(Node::is_null) {
            return Ok(types::NULL.to_string());
        }

        let resolved = match registry::property_type_info(name) {
            None => node
                .and_then(|node| node.get(names::TYPE))
                .and_then(Node::as_str)
                .unwrap_or(types::UNKNOWN)
                .to_string(),
            Some(info) => match info.single_type() {
                Some(only) => only.to_string(),
                None => Self::select_alternative(name, info.types.iter().copied(), node)?,
            },
        };

        tracing::trace!(property = name, type_name = %resolved, "Resolved property type");
        Ok(resolved)
    }

    /// ## Summary
    /// Determines the type of a collection element.
    ///
    /// ## Errors
    /// Same as [`Factory::resolve_property_type`] with the element's
    /// alternatives as the allowed set.
    pub fn resolve_element_type(name: &str, element: &str, node: &Node) -> ModelResult<String> {
        if node.is_null() {
            return Ok(types::NULL.to_string());
        }

        let mut alternatives = registry::alternatives(element);
        let resolved = match (alternatives.next(), alternatives.next()) {
            (Some(only), None) => only.to_string(),
            _ => Self::select_alternative(name, registry::alternatives(element), Some(node))?,
        };

        tracing::trace!(property = name, type_name = %resolved, "Resolved element type");
        Ok(resolved)
    }

    fn select_alternative<'a>(
        name: &str,
        allowed: impl Iterator<Item = &'a str>,
        node: Option<&Node>,
    ) -> ModelResult<String> {
        let allowed: Vec<&str> = allowed.collect();
        let found = node
            .filter(|node| node.is_object())
            .and_then(|node| node.get(names::TYPE))
            .and_then(Node::as_str)
            .ok_or_else(|| ModelError::Type(format!("cannot determine type of {name}")))?;

        if allowed.contains(&found) {
            Ok(found.to_string())
        } else {
            Err(ModelError::InvalidType {
                property: name.to_string(),
                found: found.to_string(),
                allowed: allowed.into_iter().map(str::to_string).collect(),
            })
        }
    }

    fn factory_id(name: Option<&str>, type_name: &str) -> Option<FactoryId> {
        name.and_then(registry::property_type_info)
            .and_then(|info| info.factory)
            .or_else(|| registry::type_info(type_name).and_then(|info| info.factory))
    }

    /// ## Summary
    /// Validates a node against a type without consuming it.
    ///
    /// ## Errors
    /// Returns the specialized factory's rejection, or `FactoryInit`.
    pub fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        match Self::factory_id(None, type_name) {
            Some(id) => self.value_factory(id)?.check(type_name, node),
            None => Ok(()),
        }
    }

    /// ## Summary
    /// Builds a value of a resolved type. Types without a specialized
    /// factory get a generic value.
    ///
    /// ## Errors
    /// Returns `FactoryInit` or the specialized factory's rejection.
    pub fn instantiate_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        self.instantiate(None, type_name, node)
    }

    fn instantiate(
        &self,
        name: Option<&str>,
        type_name: &str,
        node: Option<Node>,
    ) -> ModelResult<Value> {
        if type_name == types::NULL {
            return Ok(Value::null());
        }

        match Self::factory_id(name, type_name) {
            Some(id) => self.value_factory(id)?.new_value(type_name, node),
            None => Ok(Value::new(
                type_name,
                node.unwrap_or_else(|| empty_node(type_name)),
            )),
        }
    }

    /// Resolves, validates and takes a member's node. The node is left in
    /// place if resolution or validation fails.
    pub(crate) fn materialize(
        &self,
        name: &str,
        element: Option<&str>,
        node: &mut Node,
    ) -> ModelResult<Value> {
        let type_name = match element {
            Some(element) => Self::resolve_element_type(name, element, node)?,
            None => Self::resolve_property_type(name, Some(node))?,
        };
        let id = Self::factory_id(Some(name), &type_name);
        if let Some(id) = id {
            self.value_factory(id)?.check(&type_name, node)?;
        }

        self.instantiate(Some(name), &type_name, Some(std::mem::take(node)))
    }

    /// ## Summary
    /// Resolves and builds the value of a named member.
    ///
    /// ## Errors
    /// Any resolution or construction error.
    pub fn make_value(&self, name: &str, node: Option<Node>) -> ModelResult<Value> {
        match node {
            Some(mut node) => self.materialize(name, None, &mut node),
            None => self.new_property_value(name),
        }
    }

    /// ## Summary
    /// Resolves and builds a named member.
    ///
    /// ## Errors
    /// Any resolution or construction error.
    pub fn make_property(&self, name: &str, node: Option<Node>) -> ModelResult<Property> {
        Ok(Property::new(name, self.make_value(name, node)?))
    }

    /// ## Summary
    /// Builds a fresh empty value of a type.
    ///
    /// ## Errors
    /// Returns `FactoryInit`, or `Type` for types that have no empty form.
    pub fn new_value(&self, type_name: &str) -> ModelResult<Value> {
        self.instantiate(None, type_name, None)
    }

    /// ## Summary
    /// Builds a fresh empty value for a registered property.
    ///
    /// ## Errors
    /// Returns `Type` if the property is unregistered or allows several types.
    pub fn new_property_value(&self, name: &str) -> ModelResult<Value> {
        let type_name = registry::property_type_info(name)
            .and_then(|info| info.single_type())
            .ok_or_else(|| ModelError::Type(format!("no single registered type for {name}")))?;

        self.instantiate(Some(name), type_name, None)
    }

    /// ## Summary
    /// Builds a validated local date-time value.
    ///
    /// ## Errors
    /// Returns `DateTime` if the text is not a local date-time.
    pub fn local_date_time(&self, text: &str) -> ModelResult<Value> {
        let node = Node::String(text.to_string());
        self.check(types::LOCAL_DATE_TIME, &node)?;
        self.instantiate_value(types::LOCAL_DATE_TIME, Some(node))
    }
}

/// Content of a fresh generic value.
fn empty_node(type_name: &str) -> Node {
    match type_name {
        types::BOOLEAN => Node::Bool(false),
        types::INT | types::UNSIGNED_INT => Node::from(0),
        types::STRING
        | types::ID
        | types::UTC_DATE_TIME
        | types::DURATION
        | types::SIGNED_DURATION
        | types::TIME_ZONE_ID => Node::String(String::new()),
        _ => Node::Object(serde_json::Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::model::core::{ListForm, Variant};

    fn factory() -> &'static Factory {
        Factory::global()
    }

    #[test_log::test]
    fn calendar_object_dispatch() {
        let event = factory()
            .make_calendar_object(json!({"@type": "Event", "uid": "E1"}))
            .expect("event");
        assert!(matches!(event.variant(), Variant::CalendarObject(ObjectKind::Event)));

        let group = factory()
            .make_calendar_object(json!({"@type": "Group"}))
            .expect("group");
        assert!(matches!(group.variant(), Variant::CalendarObject(ObjectKind::Group)));
    }

    #[test]
    fn calendar_object_errors() {
        assert!(matches!(
            factory().make_calendar_object(json!({"uid": "E1"})),
            Err(ModelError::Type(_))
        ));
        assert!(matches!(
            factory().make_calendar_object(json!({"@type": 7})),
            Err(ModelError::Type(_))
        ));
        assert!(matches!(
            factory().make_calendar_object(json!(["Event"])),
            Err(ModelError::Type(_))
        ));
        assert!(matches!(
            factory().make_calendar_object(json!({"@type": "Journal"})),
            Err(ModelError::UnsupportedType(name)) if name == "Journal"
        ));
    }

    #[test]
    fn unregistered_names() {
        assert_eq!(Factory::resolve_property_type("x-foo", None).expect("resolves"), types::UNKNOWN);
        assert_eq!(
            Factory::resolve_property_type("x-foo", Some(&json!("bar"))).expect("resolves"),
            types::UNKNOWN
        );
        assert_eq!(
            Factory::resolve_property_type("x-foo", Some(&json!({"@type": "Location"})))
                .expect("resolves"),
            types::LOCATION
        );
        assert_eq!(
            Factory::resolve_property_type("x-foo", Some(&json!({"name": "a"}))).expect("resolves"),
            types::UNKNOWN
        );
    }

    #[test]
    fn single_type_ignores_discriminator() {
        let resolved = Factory::resolve_property_type(names::TITLE, Some(&json!({"@type": "Location"})))
            .expect("resolves");
        assert_eq!(resolved, types::STRING);
    }

    #[test]
    fn multiple_types_need_discriminator() {
        assert_eq!(
            Factory::resolve_property_type(names::TRIGGER, Some(&json!({"@type": "OffsetTrigger"})))
                .expect("resolves"),
            types::OFFSET_TRIGGER
        );
        assert!(matches!(
            Factory::resolve_property_type(names::TRIGGER, Some(&json!({"offset": "-PT5M"}))),
            Err(ModelError::Type(_))
        ));
        assert!(matches!(
            Factory::resolve_property_type(names::TRIGGER, Some(&json!("-PT5M"))),
            Err(ModelError::Type(_))
        ));
        let err = Factory::resolve_property_type(names::TRIGGER, Some(&json!({"@type": "Location"})))
            .expect_err("Location is not a trigger");
        assert!(matches!(
            err,
            ModelError::InvalidType { property, found, allowed }
                if property == names::TRIGGER && found == types::LOCATION && allowed.len() == 3
        ));
    }

    #[test]
    fn null_is_always_the_marker() {
        let f = factory();
        assert_eq!(
            Factory::resolve_property_type(names::TRIGGER, Some(&Node::Null)).expect("resolves"),
            types::NULL
        );
        let value = f.make_value(names::TITLE, Some(Node::Null)).expect("null");
        assert!(value.is_null());
        assert!(matches!(value.variant(), Variant::Null));
    }

    #[test]
    fn element_alternatives() {
        assert_eq!(
            Factory::resolve_element_type("e1", "Event|Task", &json!({"@type": "Task"}))
                .expect("resolves"),
            types::TASK
        );
        assert!(matches!(
            Factory::resolve_element_type("e1", "Event|Task", &json!({"@type": "Group"})),
            Err(ModelError::InvalidType { .. })
        ));
        assert_eq!(
            Factory::resolve_element_type("l1", "Location", &json!({})).expect("resolves"),
            types::LOCATION
        );
    }

    #[test]
    fn collections_get_specialized_variants() {
        let f = factory();
        let keywords = f.make_value(names::KEYWORDS, Some(json!({"a": true}))).expect("set");
        assert!(matches!(keywords.variant(), Variant::List(ListForm::Set)));

        let comments = f.make_value(names::COMMENTS, Some(json!(["a"]))).expect("array");
        assert!(matches!(comments.variant(), Variant::List(ListForm::Array)));

        let locations = f.new_property_value(names::LOCATIONS).expect("map");
        assert!(matches!(locations.variant(), Variant::Map { element } if element == types::LOCATION));
        assert_eq!(locations.to_node(), json!({}));

        assert!(matches!(
            f.make_value(names::COMMENTS, Some(json!({"a": true}))),
            Err(ModelError::WrongKind { .. })
        ));
    }

    #[test]
    fn new_values() {
        let f = factory();
        let event = f.new_value(types::EVENT).expect("event");
        assert_eq!(event.to_node(), json!({"@type": "Event"}));

        let location = f.new_value(types::LOCATION).expect("location");
        assert_eq!(location.to_node(), json!({"@type": "Location"}));

        let title = f.new_value(types::STRING).expect("string");
        assert_eq!(title.to_node(), json!(""));

        assert!(matches!(f.new_property_value("x-foo"), Err(ModelError::Type(_))));
        assert!(matches!(f.new_property_value(names::TRIGGER), Err(ModelError::Type(_))));
    }

    #[test]
    fn local_date_time_validation() {
        let f = factory();
        let start = f.local_date_time("2024-01-08T09:00:00").expect("valid");
        assert!(matches!(start.variant(), Variant::LocalDateTime));
        f.local_date_time("2024-01-08T09:00:00.5").expect("fraction is accepted");

        assert!(matches!(
            f.local_date_time("2024-01-08T09:00:00Z"),
            Err(ModelError::DateTime { .. })
        ));
        assert!(matches!(
            f.make_value(names::START, Some(json!("next tuesday"))),
            Err(ModelError::DateTime { .. })
        ));
    }

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    fn failing(id: FactoryId) -> Result<Box<dyn ValueFactory>, String> {
        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        match id {
            FactoryId::TypedObject => Err("no typed objects today".to_string()),
            other => builtin::construct(other),
        }
    }

    #[test_log::test]
    fn construction_failure_is_cached() {
        let local = Factory::with_constructor(failing);

        for _ in 0..3 {
            let err = local
                .instantiate_value(types::LOCATION, None)
                .expect_err("construction fails");
            assert!(matches!(
                err,
                ModelError::FactoryInit { factory: "typed object", ref reason } if reason == "no typed objects today"
            ));
        }
        local.new_value(types::EVENT).expect("other factories still work");
        local.new_value(types::TASK).expect("cached factory");

        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 2);
    }
}
