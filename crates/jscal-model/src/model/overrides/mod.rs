//! Recurrence overrides.
//!
//! An override starts out as the sparse patch object found under
//! `recurrenceOverrides`. Binding it to its master replaces that content with
//! a full occurrence (a copy of the master with the patches applied) and
//! keeps the original patch object aside. Before output the occurrence is
//! diffed back into a minimal patch object, which is what gets serialized.

mod engine;
mod patch;
mod recurrence;

pub use recurrence::RecurrenceOverrides;

pub(crate) use engine::bind;
pub(crate) use patch::write_patches;

use chrono::NaiveDateTime;

use crate::error::{ModelError, ModelResult};
use crate::model::core::{Node, Value, Variant, kind_name};
use crate::model::objects::CalendarObject;
use crate::model::registry::names;

/// Per-instance state of an override.
#[derive(Debug, Default)]
pub struct OverrideState {
    /// Snapshot of the master taken when binding.
    master: Option<Node>,
    recurrence_id: Option<String>,
    /// The patch object as found, then as regenerated by the last write.
    delta: Option<Value>,
    /// Top-level members removed from the occurrence.
    deleted: Vec<String>,
    /// Time zone set by the patch object itself, if any.
    time_zone: Option<String>,
}

impl OverrideState {
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.master.is_some()
    }

    #[must_use]
    pub fn master(&self) -> Option<&Node> {
        self.master.as_ref()
    }

    #[must_use]
    pub fn recurrence_id(&self) -> Option<&str> {
        self.recurrence_id.as_deref()
    }

    #[must_use]
    pub fn delta(&self) -> Option<&Value> {
        self.delta.as_ref()
    }

    #[must_use]
    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    pub(crate) fn record_deletion(&mut self, name: &str) {
        if self.is_bound() && !self.deleted.iter().any(|d| d == name) {
            self.deleted.push(name.to_string());
        }
    }
}

/// View over an override value.
#[derive(Debug)]
pub struct Override<'a> {
    value: &'a mut Value,
}

impl<'a> Override<'a> {
    /// ## Summary
    /// Wraps a value built by the override factory.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other value.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        if matches!(value.variant, Variant::Override(_)) {
            Ok(Self { value })
        } else {
            Err(ModelError::WrongKind {
                name: value.type_name().to_string(),
                expected: "override",
                found: value.variant.name(),
            })
        }
    }

    /// ## Summary
    /// Binds this override to its master, synthesizing the occurrence.
    ///
    /// ## Errors
    /// Returns `AlreadyBound` on a second call, and any error raised while
    /// applying the patches; see [`bind`].
    pub fn set_master(&mut self, master: Node) -> ModelResult<()> {
        bind(self.value, master)
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.value
            .override_state()
            .is_some_and(OverrideState::is_bound)
    }

    /// Returns the master snapshot taken when binding.
    #[must_use]
    pub fn master(&self) -> Option<&Node> {
        self.value.override_state().and_then(OverrideState::master)
    }

    /// Returns the recurrence id: the key this override is stored under.
    #[must_use]
    pub fn recurrence_id(&self) -> Option<&str> {
        self.value
            .override_state()
            .and_then(OverrideState::recurrence_id)
            .or(self.value.parent_property())
    }

    /// ## Summary
    /// Returns the recurrence id as a date-time.
    ///
    /// ## Errors
    /// Returns `DateTime` if the key is not a local date-time.
    pub fn recurrence_date_time(&self) -> ModelResult<Option<NaiveDateTime>> {
        self.recurrence_id()
            .map(crate::model::collections::parse_local_date_time)
            .transpose()
    }

    #[must_use]
    pub fn time_zone(&self) -> Option<&str> {
        self.value.override_state().and_then(OverrideState::time_zone)
    }

    /// Returns the current patch object: the one supplied before binding,
    /// or the one regenerated by the last write.
    #[must_use]
    pub fn delta(&self) -> Option<&Value> {
        self.value.override_state().and_then(OverrideState::delta)
    }

    /// ## Summary
    /// Returns the uid, which always comes from the master once bound.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the uid is not a string.
    pub fn uid(&self) -> ModelResult<Option<&str>> {
        match self.master() {
            Some(master) => match master.get(names::UID) {
                None | Some(Node::Null) => Ok(None),
                Some(Node::String(uid)) => Ok(Some(uid)),
                Some(other) => Err(ModelError::WrongKind {
                    name: names::UID.to_string(),
                    expected: "string",
                    found: kind_name(other),
                }),
            },
            None => self.value.string_property(names::UID),
        }
    }

    /// ## Summary
    /// Overrides cannot change the uid.
    ///
    /// ## Errors
    /// Always returns `ImmutableProperty`.
    pub fn set_uid(&mut self, uid: &str) -> ModelResult<()> {
        self.value.set_string_property(names::UID, uid)
    }

    /// ## Summary
    /// Marks this occurrence as excluded from the recurrence set.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if the override content is not an object.
    pub fn mark_excluded(&mut self) -> ModelResult<()> {
        self.value.set_boolean_property(names::EXCLUDED, true)
    }

    /// ## Summary
    /// Returns whether this occurrence is excluded.
    ///
    /// ## Errors
    /// Returns `WrongKind` if `excluded` is not a boolean.
    pub fn excluded(&self) -> ModelResult<bool> {
        self.value.boolean_property(names::EXCLUDED)
    }

    /// Returns the calendar object accessors over the occurrence.
    #[must_use]
    pub fn occurrence(&mut self) -> CalendarObject<'_> {
        CalendarObject::from_override(self.value)
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        self.value
    }
}

impl Value {
    /// Returns the override state if this value is an override.
    #[must_use]
    pub fn override_state(&self) -> Option<&OverrideState> {
        match &self.variant {
            Variant::Override(state) => Some(state),
            _ => None,
        }
    }

    /// ## Summary
    /// Returns the override view of this value.
    ///
    /// ## Errors
    /// Returns `WrongKind` if this value is not an override.
    pub fn as_override(&mut self) -> ModelResult<Override<'_>> {
        Override::new(self)
    }
}
