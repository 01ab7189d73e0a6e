//! Keyed collections over object nodes.

use std::marker::PhantomData;

use chrono::NaiveDateTime;
use jscal_core::config::get_config;
use jscal_core::constants::LOCAL_DATE_TIME_FORMAT;

use crate::error::{ModelError, ModelResult};
use crate::model::core::{Node, Property, Value, Variant};
use crate::model::factory::Factory;
use crate::model::registry;

/// Conversion between a map key and its field name.
pub trait MapKey: Sized {
    fn to_field_name(&self) -> String;

    /// ## Errors
    /// Returns an error if the field name does not encode a key.
    fn from_field_name(name: &str) -> ModelResult<Self>;
}

impl MapKey for String {
    fn to_field_name(&self) -> String {
        self.clone()
    }

    fn from_field_name(name: &str) -> ModelResult<Self> {
        Ok(name.to_string())
    }
}

impl MapKey for NaiveDateTime {
    fn to_field_name(&self) -> String {
        self.format(LOCAL_DATE_TIME_FORMAT).to_string()
    }

    fn from_field_name(name: &str) -> ModelResult<Self> {
        parse_local_date_time(name)
    }
}

/// ## Summary
/// Parses `YYYY-MM-DDTHH:MM:SS[.fff]`.
///
/// ## Errors
/// Returns `DateTime` if the text does not match.
pub fn parse_local_date_time(text: &str) -> ModelResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME_FORMAT).map_err(|source| {
        ModelError::DateTime {
            value: text.to_string(),
            source,
        }
    })
}

/// View over a `K[E]` map value.
///
/// Absent keys read as `None`. Putting an existing key replaces the entry
/// in place.
#[derive(Debug)]
pub struct Map<'a, K> {
    value: &'a mut Value,
    _key: PhantomData<K>,
}

impl<'a, K: MapKey> Map<'a, K> {
    /// ## Summary
    /// Wraps a value built by the map factory.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other value.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        if matches!(value.variant, Variant::Map { .. }) {
            Ok(Self {
                value,
                _key: PhantomData,
            })
        } else {
            Err(ModelError::WrongKind {
                name: value.type_name().to_string(),
                expected: "map",
                found: value.variant.name(),
            })
        }
    }

    /// Returns the element type, possibly with `|` alternatives.
    #[must_use]
    pub fn element_type(&self) -> &str {
        match &self.value.variant {
            Variant::Map { element } => element,
            _ => "",
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.value.properties().map_or(0, <[Property]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// ## Summary
    /// Returns the keys in document order.
    ///
    /// ## Errors
    /// Returns an error if a field name does not encode a key.
    pub fn keys(&self) -> ModelResult<Vec<K>> {
        self.value
            .properties()?
            .iter()
            .map(|prop| K::from_field_name(prop.name()))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.value.has_property(&key.to_field_name())
    }

    /// ## Summary
    /// Returns the entry for `key`, or `None` if absent.
    ///
    /// ## Errors
    /// Returns a resolution error if the entry cannot be materialized.
    pub fn get(&mut self, key: &K) -> ModelResult<Option<&mut Value>> {
        self.value.property_value(&key.to_field_name())
    }

    /// ## Summary
    /// Returns every entry in document order.
    ///
    /// ## Errors
    /// Returns the first key conversion or resolution error.
    pub fn entries(&mut self) -> ModelResult<Vec<(K, &mut Value)>> {
        self.value
            .properties_mut()?
            .iter_mut()
            .map(|prop| {
                let key = K::from_field_name(prop.name())?;
                Ok((key, prop.value()?))
            })
            .collect()
    }

    /// ## Summary
    /// Adds or replaces the entry for `key`.
    ///
    /// ## Errors
    /// Returns `ImmutableProperty` if this map belongs to an override and the
    /// key is immutable.
    pub fn put(&mut self, key: &K, entry: Value) -> ModelResult<&mut Value> {
        self.value
            .set_property(Property::new(key.to_field_name(), entry))?
            .value()
    }

    /// ## Summary
    /// Adds or replaces the entry for `key` from a node, typed as an element.
    ///
    /// ## Errors
    /// Returns a resolution error if the node is not a valid element.
    pub fn put_node(&mut self, key: &K, node: Node) -> ModelResult<&mut Value> {
        let prop = self.value.member(&key.to_field_name(), node)?;
        self.value.set_property(prop)?.value()
    }

    /// ## Summary
    /// Removes the entry for `key`, returning it if present.
    ///
    /// ## Errors
    /// Returns a resolution error if the removed entry cannot be materialized.
    pub fn remove(&mut self, key: &K) -> ModelResult<Option<Value>> {
        self.value
            .remove_property(&key.to_field_name())?
            .map(Property::into_value)
            .transpose()
    }

    /// ## Summary
    /// Inserts a fresh empty element under `key`.
    ///
    /// ## Errors
    /// Returns `Type` if the element type has alternatives, since an empty
    /// entry cannot pick one.
    pub fn make_entry(&mut self, key: &K) -> ModelResult<&mut Value> {
        let element_type = self.element_type().to_string();
        let mut alternatives = registry::alternatives(&element_type);
        let element = match (alternatives.next(), alternatives.next()) {
            (Some(only), None) => only,
            _ => {
                return Err(ModelError::Type(format!(
                    "cannot create an empty {element_type} entry"
                )));
            }
        };

        let entry = Factory::global().new_value(element)?;
        self.put(key, entry)
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        self.value
    }
}

impl Map<'_, String> {
    /// ## Summary
    /// Inserts a fresh empty element under a newly generated id.
    ///
    /// ## Errors
    /// Same as [`Map::make_entry`].
    pub fn make_entry_with_id(&mut self) -> ModelResult<(String, &mut Value)> {
        let id = get_config().ids.version.generate().to_string();
        let entry = self.make_entry(&id)?;
        Ok((id, entry))
    }
}
