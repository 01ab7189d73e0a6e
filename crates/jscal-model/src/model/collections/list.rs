//! Ordered collections over array nodes and string sets.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ModelError, ModelResult};
use crate::model::core::{ListForm, Node, Property, Value, Variant, kind_name};

/// View over an `E[]` array or a `String[Boolean]` set.
///
/// Elements convert through serde. Set elements must serialize to strings.
#[derive(Debug)]
pub struct List<'a, T> {
    value: &'a mut Value,
    form: ListForm,
    _element: PhantomData<T>,
}

impl<'a, T: Serialize + DeserializeOwned> List<'a, T> {
    /// ## Summary
    /// Wraps a value built by the list factory.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other value.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        let Variant::List(form) = value.variant else {
            return Err(ModelError::WrongKind {
                name: value.type_name().to_string(),
                expected: "list",
                found: value.variant.name(),
            });
        };
        Ok(Self {
            value,
            form,
            _element: PhantomData,
        })
    }

    #[must_use]
    pub fn form(&self) -> ListForm {
        self.form
    }

    #[must_use]
    pub fn size(&self) -> usize {
        match self.form {
            ListForm::Array => self
                .value
                .leaf()
                .and_then(Node::as_array)
                .map_or(0, Vec::len),
            ListForm::Set => self.value.properties().map_or(0, <[Property]>::len),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn nodes(&self) -> Vec<Node> {
        match self.form {
            ListForm::Array => self
                .value
                .leaf()
                .and_then(Node::as_array)
                .cloned()
                .unwrap_or_default(),
            ListForm::Set => self
                .value
                .properties()
                .map(|props| {
                    props
                        .iter()
                        .map(|prop| Node::String(prop.name().to_string()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// ## Summary
    /// Returns every element in order.
    ///
    /// ## Errors
    /// Returns `Json` if an element does not convert to `T`.
    pub fn get(&self) -> ModelResult<Vec<T>> {
        self.nodes()
            .into_iter()
            .map(|node| serde_json::from_value(node).map_err(ModelError::from))
            .collect()
    }

    /// ## Summary
    /// Returns the element at `index`, or `None` past the end.
    ///
    /// ## Errors
    /// Returns `Json` if the element does not convert to `T`.
    pub fn get_index(&self, index: usize) -> ModelResult<Option<T>> {
        self.nodes()
            .into_iter()
            .nth(index)
            .map(serde_json::from_value)
            .transpose()
            .map_err(ModelError::from)
    }

    /// ## Summary
    /// Returns whether an equal element is present.
    ///
    /// ## Errors
    /// Returns `Json` if `element` cannot be serialized.
    pub fn contains(&self, element: &T) -> ModelResult<bool> {
        let node = serde_json::to_value(element)?;
        Ok(self.nodes().contains(&node))
    }

    /// ## Summary
    /// Appends an element. Adding an element already in a set is a no-op.
    ///
    /// ## Errors
    /// Returns `Json` if `element` cannot be serialized, `WrongKind` if a set
    /// element is not a string.
    pub fn add(&mut self, element: &T) -> ModelResult<()> {
        let node = serde_json::to_value(element)?;
        match self.form {
            ListForm::Array => {
                if let Some(Node::Array(items)) = self.value.leaf_mut() {
                    items.push(node);
                    self.value.changed = true;
                }
                Ok(())
            }
            ListForm::Set => {
                let name = set_element(&node)?;
                if !self.value.has_property(name) {
                    self.value
                        .set_property(Property::new(name, Value::boolean(true)))?;
                }
                Ok(())
            }
        }
    }

    /// ## Summary
    /// Removes the first equal element. Returns whether one was removed.
    ///
    /// ## Errors
    /// Returns `Json` if `element` cannot be serialized, `WrongKind` if a set
    /// element is not a string.
    pub fn remove(&mut self, element: &T) -> ModelResult<bool> {
        let node = serde_json::to_value(element)?;
        match self.form {
            ListForm::Array => {
                let Some(Node::Array(items)) = self.value.leaf_mut() else {
                    return Ok(false);
                };
                let Some(index) = items.iter().position(|item| *item == node) else {
                    return Ok(false);
                };
                items.remove(index);
                self.value.changed = true;
                Ok(true)
            }
            ListForm::Set => Ok(self.value.remove_property(set_element(&node)?)?.is_some()),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        self.value
    }
}

fn set_element(node: &Node) -> ModelResult<&str> {
    node.as_str().ok_or_else(|| ModelError::WrongKind {
        name: "set element".to_string(),
        expected: "string",
        found: kind_name(node),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::factory::Factory;
    use crate::model::registry::names;

    #[test]
    fn array_keeps_insertion_order() {
        let mut value = Factory::global()
            .new_property_value(names::COMMENTS)
            .expect("array");
        let mut list = List::<String>::new(&mut value).expect("list view");
        list.add(&"x".to_string()).expect("add");
        list.add(&"y".to_string()).expect("add");

        assert_eq!(list.get().expect("elements"), vec!["x", "y"]);
        assert_eq!(list.size(), 2);
        assert_eq!(list.get_index(1).expect("element"), Some("y".to_string()));
        assert_eq!(list.get_index(2).expect("past the end"), None);
        assert!(value.changed());
        assert_eq!(value.to_node(), json!(["x", "y"]));
    }

    #[test]
    fn set_ignores_duplicates() {
        let mut value = Factory::global()
            .make_value(names::KEYWORDS, Some(json!({"standup": true})))
            .expect("set");
        let mut list = List::<String>::new(&mut value).expect("list view");
        list.add(&"standup".to_string()).expect("add");
        list.add(&"daily".to_string()).expect("add");

        assert_eq!(list.get().expect("elements"), vec!["standup", "daily"]);
        assert!(list.contains(&"daily".to_string()).expect("contains"));
        assert!(list.remove(&"standup".to_string()).expect("remove"));
        assert!(!list.remove(&"standup".to_string()).expect("remove"));
        assert_eq!(value.to_node(), json!({"daily": true}));
    }

    #[test]
    fn set_elements_must_be_strings() {
        let mut value = Factory::global()
            .new_property_value(names::KEYWORDS)
            .expect("set");
        let mut list = List::<u32>::new(&mut value).expect("list view");
        assert!(matches!(list.add(&7), Err(ModelError::WrongKind { .. })));
    }

    #[test]
    fn conversion_errors() {
        let mut value = Factory::global()
            .make_value(names::BY_MONTH_DAY, Some(json!([1, "x"])))
            .expect("array");
        let list = List::<i32>::new(&mut value).expect("list view");
        assert_eq!(list.get_index(0).expect("element"), Some(1));
        assert!(matches!(list.get(), Err(ModelError::Json(_))));
    }
}
