//! Variant tags selected once when a value is constructed.

use crate::error::{ModelError, ModelResult};
use crate::model::overrides::OverrideState;
use crate::model::registry::types;

/// Calendar object kind, selected by the discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Event,
    Task,
    Group,
}

impl ObjectKind {
    /// Returns the discriminator value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => types::EVENT,
            Self::Task => types::TASK,
            Self::Group => types::GROUP,
        }
    }

    /// ## Summary
    /// Maps a discriminator value to a calendar object kind.
    ///
    /// ## Errors
    /// Returns `UnsupportedType` for any other type name.
    pub fn from_type(type_name: &str) -> ModelResult<Self> {
        match type_name {
            types::EVENT => Ok(Self::Event),
            types::TASK => Ok(Self::Task),
            types::GROUP => Ok(Self::Group),
            other => Err(ModelError::UnsupportedType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node shape of a list collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListForm {
    /// `E[]`: elements are array items.
    Array,
    /// `String[Boolean]`: elements are field names mapped to `true`.
    Set,
}

/// Specialization attached to a value.
///
/// The type name stays the source of truth for what the value represents;
/// the variant carries the behaviour and any per-instance state.
#[derive(Debug)]
pub enum Variant {
    /// Plain wrapper, no specialized behaviour.
    Generic,
    /// Explicit JSON `null`, the deletion marker in patch objects.
    Null,
    CalendarObject(ObjectKind),
    /// A recurrence override; holds the synthesis state.
    Override(Box<OverrideState>),
    /// A nested object with a discriminator (Location, Link, ...).
    TypedObject,
    /// `K[E]` map; `element` may list alternatives (`Event|Task`).
    Map { element: String },
    List(ListForm),
    LocalDateTime,
}

impl Variant {
    /// Short name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Null => "null",
            Self::CalendarObject(_) => "calendar object",
            Self::Override(_) => "override",
            Self::TypedObject => "typed object",
            Self::Map { .. } => "map",
            Self::List(_) => "list",
            Self::LocalDateTime => "local date-time",
        }
    }

    /// Returns the same tag without any per-instance state.
    pub(crate) fn detached(&self) -> Self {
        match self {
            Self::Generic => Self::Generic,
            Self::Null => Self::Null,
            Self::CalendarObject(kind) => Self::CalendarObject(*kind),
            Self::Override(_) => Self::Override(Box::default()),
            Self::TypedObject => Self::TypedObject,
            Self::Map { element } => Self::Map {
                element: element.clone(),
            },
            Self::List(form) => Self::List(*form),
            Self::LocalDateTime => Self::LocalDateTime,
        }
    }
}
