use super::require_type;
use crate::error::ModelResult;
use crate::model::collections::List;
use crate::model::core::Value;
use crate::model::registry::{names, types};

/// A relation to another calendar object, keyed by its uid.
#[derive(Debug)]
pub struct Relation<'a> {
    value: &'a mut Value,
}

impl<'a> Relation<'a> {
    /// ## Summary
    /// Wraps a `Relation` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::RELATION)?,
        })
    }

    /// Returns the uid of the related object.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.value.parent_property()
    }

    /// ## Summary
    /// Returns the relation types (`parent`, `next`, ...), creating the set
    /// when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn relation(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.value
            .value_for(names::RELATION, create)?
            .map(List::new)
            .transpose()
    }
}
