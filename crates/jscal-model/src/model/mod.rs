//! JSCalendar object model.

pub mod collections;
pub mod core;
pub mod factory;
pub mod objects;
pub mod overrides;
pub mod registry;

pub use collections::{List, Map, MapKey};
pub use self::core::{ListForm, Node, ObjectKind, Property, Value, Variant};
pub use factory::{Factory, ValueFactory};
pub use objects::CalendarObject;
pub use overrides::{Override, OverrideState, RecurrenceOverrides};
