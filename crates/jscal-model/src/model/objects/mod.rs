//! Domain accessors over calendar objects and their nested objects.
//!
//! Views borrow a [`Value`] mutably and read or write its members by name.
//! They hold no state of their own.

/// Generates getter/setter pairs for string members of a view.
macro_rules! string_accessors {
    ($($get:ident, $set:ident => $name:expr;)*) => {
        $(
            #[doc = concat!("## Summary\nReturns `", stringify!($get), "`.\n\n## Errors\nReturns `WrongKind` if the member is not a string.")]
            pub fn $get(&self) -> ModelResult<Option<&str>> {
                self.value.string_property($name)
            }

            #[doc = concat!("## Summary\nSets `", stringify!($get), "`.\n\n## Errors\nReturns `ImmutableProperty` for an immutable member of an override.")]
            pub fn $set(&mut self, val: impl Into<String>) -> ModelResult<()> {
                self.value.set_string_property($name, val)
            }
        )*
    };
}

mod alert;
mod calendar;
mod link;
mod location;
mod participant;
mod recurrence_rule;
mod relation;

pub use alert::Alert;
pub use calendar::CalendarObject;
pub use link::Link;
pub use location::{Location, VirtualLocation};
pub use participant::Participant;
pub use recurrence_rule::{Frequency, NDay, RecurrenceRule};
pub use relation::Relation;

use crate::error::{ModelError, ModelResult};
use crate::model::core::Value;

/// Checks that a value has the type a view expects.
fn require_type<'a>(value: &'a mut Value, expected: &'static str) -> ModelResult<&'a mut Value> {
    if value.type_name() == expected {
        Ok(value)
    } else {
        Err(ModelError::WrongKind {
            name: value.type_name().to_string(),
            expected,
            found: value.variant().name(),
        })
    }
}
