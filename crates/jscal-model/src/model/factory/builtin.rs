//! Specialized factories shipped with the model.

use chrono::format::{Item, Parsed, StrftimeItems};
use jscal_core::constants::LOCAL_DATE_TIME_FORMAT;
use serde_json::Map as Members;

use super::ValueFactory;
use crate::error::{ModelError, ModelResult};
use crate::model::core::{ListForm, Node, ObjectKind, Value, Variant, kind_name};
use crate::model::registry::{CollectionShape, FactoryId, collection_shape, names};

/// Builds the specialized factory for `id`.
pub(super) fn construct(id: FactoryId) -> Result<Box<dyn ValueFactory>, String> {
    Ok(match id {
        FactoryId::CalendarObject => Box::new(CalendarObjectFactory),
        FactoryId::Override => Box::new(OverrideFactory),
        FactoryId::TypedObject => Box::new(TypedObjectFactory),
        FactoryId::Map => Box::new(MapFactory),
        FactoryId::List => Box::new(ListFactory),
        FactoryId::LocalDateTime => Box::new(LocalDateTimeFactory::new()?),
    })
}

fn require_object(type_name: &str, node: &Node) -> ModelResult<()> {
    if node.is_object() {
        Ok(())
    } else {
        Err(ModelError::WrongKind {
            name: type_name.to_string(),
            expected: "object",
            found: kind_name(node),
        })
    }
}

/// An object carrying only its discriminator.
fn typed_node(type_name: &str) -> Node {
    let mut members = Members::new();
    members.insert(names::TYPE.to_string(), Node::String(type_name.to_string()));
    Node::Object(members)
}

#[derive(Debug)]
struct CalendarObjectFactory;

impl ValueFactory for CalendarObjectFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        require_object(type_name, node)
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let kind = ObjectKind::from_type(type_name)?;
        let node = node.unwrap_or_else(|| typed_node(type_name));
        self.check(type_name, &node)?;
        Ok(Value::wrap(type_name, Variant::CalendarObject(kind), node))
    }
}

#[derive(Debug)]
struct OverrideFactory;

impl ValueFactory for OverrideFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        require_object(type_name, node)
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let node = node.unwrap_or_else(|| Node::Object(Members::new()));
        self.check(type_name, &node)?;
        Ok(Value::wrap(type_name, Variant::Override(Box::default()), node))
    }
}

#[derive(Debug)]
struct TypedObjectFactory;

impl ValueFactory for TypedObjectFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        require_object(type_name, node)
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let node = node.unwrap_or_else(|| typed_node(type_name));
        self.check(type_name, &node)?;
        Ok(Value::wrap(type_name, Variant::TypedObject, node))
    }
}

#[derive(Debug)]
struct MapFactory;

impl ValueFactory for MapFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        require_object(type_name, node)
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let Some(CollectionShape::Map { element, .. }) = collection_shape(type_name) else {
            return Err(ModelError::Type(format!("{type_name} is not a map type")));
        };

        let node = node.unwrap_or_else(|| Node::Object(Members::new()));
        self.check(type_name, &node)?;
        Ok(Value::wrap(
            type_name,
            Variant::Map {
                element: element.to_string(),
            },
            node,
        ))
    }
}

#[derive(Debug)]
struct ListFactory;

impl ListFactory {
    fn form(type_name: &str) -> ModelResult<ListForm> {
        match collection_shape(type_name) {
            Some(CollectionShape::Set) => Ok(ListForm::Set),
            Some(CollectionShape::Array { .. }) => Ok(ListForm::Array),
            _ => Err(ModelError::Type(format!("{type_name} is not a list type"))),
        }
    }
}

impl ValueFactory for ListFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        let (expected, matches) = match Self::form(type_name)? {
            ListForm::Set => ("object", node.is_object()),
            ListForm::Array => ("array", node.is_array()),
        };

        if matches {
            Ok(())
        } else {
            Err(ModelError::WrongKind {
                name: type_name.to_string(),
                expected,
                found: kind_name(node),
            })
        }
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let form = Self::form(type_name)?;
        let node = node.unwrap_or_else(|| match form {
            ListForm::Set => Node::Object(Members::new()),
            ListForm::Array => Node::Array(Vec::new()),
        });
        self.check(type_name, &node)?;
        Ok(Value::wrap(type_name, Variant::List(form), node))
    }
}

/// Validates `YYYY-MM-DDTHH:MM:SS[.fff]` text.
#[derive(Debug)]
struct LocalDateTimeFactory {
    items: Vec<Item<'static>>,
}

impl LocalDateTimeFactory {
    fn new() -> Result<Self, String> {
        let items = StrftimeItems::new(LOCAL_DATE_TIME_FORMAT)
            .parse()
            .map_err(|e| format!("invalid format {LOCAL_DATE_TIME_FORMAT:?}: {e}"))?;
        Ok(Self { items })
    }
}

impl ValueFactory for LocalDateTimeFactory {
    fn check(&self, type_name: &str, node: &Node) -> ModelResult<()> {
        let Node::String(text) = node else {
            return Err(ModelError::WrongKind {
                name: type_name.to_string(),
                expected: "string",
                found: kind_name(node),
            });
        };

        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, self.items.iter())
            .and_then(|()| parsed.to_naive_datetime_with_offset(0))
            .map(|_| ())
            .map_err(|source| ModelError::DateTime {
                value: text.clone(),
                source,
            })
    }

    fn new_value(&self, type_name: &str, node: Option<Node>) -> ModelResult<Value> {
        let node = node.ok_or_else(|| {
            ModelError::Type(format!("{type_name} has no empty form"))
        })?;
        self.check(type_name, &node)?;
        Ok(Value::wrap(type_name, Variant::LocalDateTime, node))
    }
}
