//! The `recurrenceOverrides` collection of a recurring object.

use chrono::NaiveDateTime;

use super::{Override, OverrideState, bind};
use crate::error::ModelResult;
use crate::model::collections::Map;
use crate::model::core::{Node, Value};
use crate::model::factory::Factory;
use crate::model::registry::types;

fn bound(entry: &mut Value, master: &Node) -> ModelResult<()> {
    if entry.override_state().is_some_and(OverrideState::is_bound) {
        return Ok(());
    }
    bind(entry, master.clone())
}

/// Map of recurrence id to override, binding each entry to the master on
/// first access.
#[derive(Debug)]
pub struct RecurrenceOverrides<'a> {
    map: Map<'a, NaiveDateTime>,
    master: Node,
}

impl<'a> RecurrenceOverrides<'a> {
    /// ## Summary
    /// Wraps the overrides map of a master whose snapshot is `master`.
    ///
    /// ## Errors
    /// Returns `WrongKind` if `value` is not a map.
    pub fn new(value: &'a mut Value, master: Node) -> ModelResult<Self> {
        Ok(Self {
            map: Map::new(value)?,
            master,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.map.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// ## Summary
    /// Returns the recurrence ids in document order.
    ///
    /// ## Errors
    /// Returns `DateTime` if a key is not a local date-time.
    pub fn keys(&self) -> ModelResult<Vec<NaiveDateTime>> {
        self.map.keys()
    }

    #[must_use]
    pub fn contains(&self, rid: &NaiveDateTime) -> bool {
        self.map.contains(rid)
    }

    /// ## Summary
    /// Returns the bound override for `rid`, or `None` if absent.
    ///
    /// ## Errors
    /// Returns any error raised while binding the entry.
    pub fn get(&mut self, rid: &NaiveDateTime) -> ModelResult<Option<Override<'_>>> {
        let Some(entry) = self.map.get(rid)? else {
            return Ok(None);
        };
        bound(entry, &self.master)?;
        Override::new(entry).map(Some)
    }

    /// ## Summary
    /// Returns every override, bound, in document order.
    ///
    /// ## Errors
    /// Returns the first key, resolution or binding error.
    pub fn entries(&mut self) -> ModelResult<Vec<(NaiveDateTime, Override<'_>)>> {
        let master = &self.master;
        self.map
            .entries()?
            .into_iter()
            .map(|(rid, entry)| {
                bound(entry, master)?;
                Ok((rid, Override::new(entry)?))
            })
            .collect()
    }

    /// ## Summary
    /// Adds an empty override for `rid`, bound to the master.
    ///
    /// ## Errors
    /// Returns any error raised while binding the entry.
    pub fn make_override(&mut self, rid: &NaiveDateTime) -> ModelResult<Override<'_>> {
        let entry = Factory::global().new_value(types::PATCH_OBJECT)?;
        let entry = self.map.put(rid, entry)?;
        bind(entry, self.master.clone())?;
        Override::new(entry)
    }

    /// ## Summary
    /// Removes the override for `rid`. Returns whether one was present.
    ///
    /// ## Errors
    /// Returns a resolution error if the removed entry cannot be materialized.
    pub fn remove(&mut self, rid: &NaiveDateTime) -> ModelResult<bool> {
        Ok(self.map.remove(rid)?.is_some())
    }
}
