use super::require_type;
use crate::error::ModelResult;
use crate::model::collections::List;
use crate::model::core::Value;
use crate::model::registry::{names, types};

/// A physical location.
#[derive(Debug)]
pub struct Location<'a> {
    value: &'a mut Value,
}

impl<'a> Location<'a> {
    /// ## Summary
    /// Wraps a `Location` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::LOCATION)?,
        })
    }

    /// Returns the key this location is stored under.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.value.parent_property()
    }

    string_accessors! {
        name, set_name => names::NAME;
        description, set_description => names::DESCRIPTION;
        coordinates, set_coordinates => names::COORDINATES;
        time_zone, set_time_zone => names::TIME_ZONE;
        relative_to, set_relative_to => names::RELATIVE_TO;
    }

    /// ## Summary
    /// Returns the location types, creating the set when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn location_types(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.value
            .value_for(names::LOCATION_TYPES, create)?
            .map(List::new)
            .transpose()
    }
}

/// A virtual location such as a conference URI.
#[derive(Debug)]
pub struct VirtualLocation<'a> {
    value: &'a mut Value,
}

impl<'a> VirtualLocation<'a> {
    /// ## Summary
    /// Wraps a `VirtualLocation` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::VIRTUAL_LOCATION)?,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.value.parent_property()
    }

    string_accessors! {
        name, set_name => names::NAME;
        description, set_description => names::DESCRIPTION;
        uri, set_uri => names::URI;
    }

    /// ## Summary
    /// Returns the feature set, creating it when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn features(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.value
            .value_for(names::FEATURES, create)?
            .map(List::new)
            .transpose()
    }
}
