//! Static type registry.
//!
//! Two read-only lookups drive value construction:
//! - [`property_type_info`]: property name to allowed type(s), plus an
//!   optional factory that takes precedence over the type's own.
//! - [`type_info`]: type name to the factory that builds it, if any.
//!
//! Collection types are written in bracket notation and are recognised
//! structurally rather than listed: `K[E]` is a map keyed by `K` holding
//! `E` elements, `String[Boolean]` is a string set and `E[]` is an array.

pub mod names;
pub mod types;

use types::{ALTERNATIVE_SEPARATOR, BOOLEAN, STRING};

/// Identifies one specialized value factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactoryId {
    CalendarObject,
    Override,
    TypedObject,
    Map,
    List,
    LocalDateTime,
}

impl FactoryId {
    pub const ALL: [Self; 6] = [
        Self::CalendarObject,
        Self::Override,
        Self::TypedObject,
        Self::Map,
        Self::List,
        Self::LocalDateTime,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`FactoryId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalendarObject => "calendar object",
            Self::Override => "override",
            Self::TypedObject => "typed object",
            Self::Map => "map",
            Self::List => "list",
            Self::LocalDateTime => "local date-time",
        }
    }
}

impl std::fmt::Display for FactoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTypeInfo {
    pub name: &'static str,
    /// Allowed types. With more than one, the node's discriminator decides.
    pub types: &'static [&'static str],
    pub factory: Option<FactoryId>,
}

impl PropertyTypeInfo {
    const fn of(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            factory: None,
        }
    }

    /// Returns the single allowed type, if there is exactly one.
    #[must_use]
    pub fn single_type(&self) -> Option<&'static str> {
        match self.types {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Registry entry for a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub factory: Option<FactoryId>,
}

/// Structure of a bracket-notation collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape<'a> {
    /// `K[E]`: object node, field names are keys.
    Map { key: &'a str, element: &'a str },
    /// `String[Boolean]`: object node whose field names are the elements.
    Set,
    /// `E[]`: array node.
    Array { element: &'a str },
}

/// Properties whose value is fixed by the master of a recurrence override.
pub const IMMUTABLE: [&str; 9] = [
    names::TYPE,
    names::PRIVACY,
    names::PROD_ID,
    names::RECURRENCE_ID,
    names::RECURRENCE_OVERRIDES,
    names::RECURRENCE_RULES,
    names::RELATED_TO,
    names::REPLY_TO,
    names::UID,
];

/// Recurrence collections; never copied into a synthesized occurrence.
pub const RECURRENCE_COLLECTIONS: [&str; 3] = [
    names::RECURRENCE_OVERRIDES,
    names::RECURRENCE_RULES,
    names::EXCLUDED_RECURRENCE_RULES,
];

#[must_use]
pub fn is_immutable(name: &str) -> bool {
    IMMUTABLE.contains(&name)
}

use names as n;
use types as t;

const STRING_SET: &str = "String[Boolean]";
const STRING_MAP: &str = "String[String]";
const INT_ARRAY: &str = "Int[]";

static PROPERTIES: &[PropertyTypeInfo] = &[
    // Common
    PropertyTypeInfo::of(n::TYPE, &[t::STRING]),
    PropertyTypeInfo::of(n::UID, &[t::STRING]),
    PropertyTypeInfo::of(n::PROD_ID, &[t::STRING]),
    PropertyTypeInfo::of(n::CREATED, &[t::UTC_DATE_TIME]),
    PropertyTypeInfo::of(n::UPDATED, &[t::UTC_DATE_TIME]),
    PropertyTypeInfo::of(n::SEQUENCE, &[t::UNSIGNED_INT]),
    PropertyTypeInfo::of(n::METHOD, &[t::STRING]),
    PropertyTypeInfo::of(n::TITLE, &[t::STRING]),
    PropertyTypeInfo::of(n::DESCRIPTION, &[t::STRING]),
    PropertyTypeInfo::of(n::DESCRIPTION_CONTENT_TYPE, &[t::STRING]),
    PropertyTypeInfo::of(n::SHOW_WITHOUT_TIME, &[t::BOOLEAN]),
    PropertyTypeInfo::of(n::LOCALE, &[t::STRING]),
    PropertyTypeInfo::of(n::KEYWORDS, &[STRING_SET]),
    PropertyTypeInfo::of(n::CATEGORIES, &[STRING_SET]),
    PropertyTypeInfo::of(n::COLOR, &[t::STRING]),
    PropertyTypeInfo::of(n::COMMENTS, &["String[]"]),
    PropertyTypeInfo::of(n::PRIVACY, &[t::STRING]),
    PropertyTypeInfo::of(n::STATUS, &[t::STRING]),
    PropertyTypeInfo::of(n::FREE_BUSY_STATUS, &[t::STRING]),
    PropertyTypeInfo::of(n::PRIORITY, &[t::INT]),
    PropertyTypeInfo::of(n::TIME_ZONE, &[t::TIME_ZONE_ID]),
    PropertyTypeInfo::of(n::REPLY_TO, &[STRING_MAP]),
    PropertyTypeInfo::of(n::RELATED_TO, &["String[Relation]"]),
    PropertyTypeInfo::of(n::USE_DEFAULT_ALERTS, &[t::BOOLEAN]),
    PropertyTypeInfo::of(n::LOCATIONS, &["Id[Location]"]),
    PropertyTypeInfo::of(n::VIRTUAL_LOCATIONS, &["Id[VirtualLocation]"]),
    PropertyTypeInfo::of(n::LINKS, &["Id[Link]"]),
    PropertyTypeInfo::of(n::PARTICIPANTS, &["Id[Participant]"]),
    PropertyTypeInfo::of(n::ALERTS, &["Id[Alert]"]),
    // Time
    PropertyTypeInfo::of(n::START, &[t::LOCAL_DATE_TIME]),
    PropertyTypeInfo::of(n::DURATION, &[t::DURATION]),
    PropertyTypeInfo::of(n::DUE, &[t::LOCAL_DATE_TIME]),
    PropertyTypeInfo::of(n::ESTIMATED_DURATION, &[t::DURATION]),
    PropertyTypeInfo::of(n::PERCENT_COMPLETE, &[t::UNSIGNED_INT]),
    PropertyTypeInfo::of(n::PROGRESS, &[t::STRING]),
    // Recurrence
    PropertyTypeInfo::of(n::RECURRENCE_ID, &[t::LOCAL_DATE_TIME]),
    PropertyTypeInfo::of(n::RECURRENCE_ID_TIME_ZONE, &[t::TIME_ZONE_ID]),
    PropertyTypeInfo::of(n::RECURRENCE_RULES, &["RecurrenceRule[]"]),
    PropertyTypeInfo::of(n::EXCLUDED_RECURRENCE_RULES, &["RecurrenceRule[]"]),
    PropertyTypeInfo::of(n::RECURRENCE_OVERRIDES, &["LocalDateTime[PatchObject]"]),
    PropertyTypeInfo::of(n::EXCLUDED, &[t::BOOLEAN]),
    // Group
    PropertyTypeInfo::of(n::ENTRIES, &["Id[Event|Task]"]),
    PropertyTypeInfo::of(n::SOURCE, &[t::STRING]),
    // Location / VirtualLocation
    PropertyTypeInfo::of(n::NAME, &[t::STRING]),
    PropertyTypeInfo::of(n::LOCATION_TYPES, &[STRING_SET]),
    PropertyTypeInfo::of(n::COORDINATES, &[t::STRING]),
    PropertyTypeInfo::of(n::URI, &[t::STRING]),
    PropertyTypeInfo::of(n::FEATURES, &[STRING_SET]),
    // Link
    PropertyTypeInfo::of(n::HREF, &[t::STRING]),
    PropertyTypeInfo::of(n::CID, &[t::STRING]),
    PropertyTypeInfo::of(n::CONTENT_TYPE, &[t::STRING]),
    PropertyTypeInfo::of(n::SIZE, &[t::UNSIGNED_INT]),
    PropertyTypeInfo::of(n::REL, &[t::STRING]),
    PropertyTypeInfo::of(n::DISPLAY, &[t::STRING]),
    // Participant
    PropertyTypeInfo::of(n::EMAIL, &[t::STRING]),
    PropertyTypeInfo::of(n::KIND, &[t::STRING]),
    PropertyTypeInfo::of(n::ROLES, &[STRING_SET]),
    PropertyTypeInfo::of(n::LANGUAGE, &[t::STRING]),
    PropertyTypeInfo::of(n::LOCATION_ID, &[t::ID]),
    PropertyTypeInfo::of(n::SEND_TO, &[STRING_MAP]),
    PropertyTypeInfo::of(n::EXPECT_REPLY, &[t::BOOLEAN]),
    PropertyTypeInfo::of(n::INVITED_BY, &[t::ID]),
    PropertyTypeInfo::of(n::DELEGATED_TO, &[STRING_SET]),
    PropertyTypeInfo::of(n::DELEGATED_FROM, &[STRING_SET]),
    PropertyTypeInfo::of(n::MEMBER_OF, &[STRING_SET]),
    PropertyTypeInfo::of(n::LINK_IDS, &[STRING_SET]),
    PropertyTypeInfo::of(n::PARTICIPATION_STATUS, &[t::STRING]),
    PropertyTypeInfo::of(n::PARTICIPATION_COMMENT, &[t::STRING]),
    PropertyTypeInfo::of(n::SCHEDULE_AGENT, &[t::STRING]),
    // Relation
    PropertyTypeInfo::of(n::RELATION, &[STRING_SET]),
    // Alert
    PropertyTypeInfo::of(
        n::TRIGGER,
        &[t::OFFSET_TRIGGER, t::ABSOLUTE_TRIGGER, t::UNKNOWN_TRIGGER],
    ),
    PropertyTypeInfo::of(n::ACTION, &[t::STRING]),
    PropertyTypeInfo::of(n::ACKNOWLEDGED, &[t::UTC_DATE_TIME]),
    PropertyTypeInfo::of(n::OFFSET, &[t::SIGNED_DURATION]),
    PropertyTypeInfo::of(n::RELATIVE_TO, &[t::STRING]),
    PropertyTypeInfo::of(n::WHEN, &[t::UTC_DATE_TIME]),
    // RecurrenceRule
    PropertyTypeInfo::of(n::FREQUENCY, &[t::STRING]),
    PropertyTypeInfo::of(n::INTERVAL, &[t::UNSIGNED_INT]),
    PropertyTypeInfo::of(n::RSCALE, &[t::STRING]),
    PropertyTypeInfo::of(n::SKIP, &[t::STRING]),
    PropertyTypeInfo::of(n::FIRST_DAY_OF_WEEK, &[t::STRING]),
    PropertyTypeInfo::of(n::BY_DAY, &["NDay[]"]),
    PropertyTypeInfo::of(n::BY_MONTH_DAY, &[INT_ARRAY]),
    PropertyTypeInfo::of(n::BY_MONTH, &["String[]"]),
    PropertyTypeInfo::of(n::BY_YEAR_DAY, &[INT_ARRAY]),
    PropertyTypeInfo::of(n::BY_WEEK_NO, &[INT_ARRAY]),
    PropertyTypeInfo::of(n::BY_HOUR, &["UnsignedInt[]"]),
    PropertyTypeInfo::of(n::BY_MINUTE, &["UnsignedInt[]"]),
    PropertyTypeInfo::of(n::BY_SECOND, &["UnsignedInt[]"]),
    PropertyTypeInfo::of(n::BY_SET_POSITION, &[INT_ARRAY]),
    PropertyTypeInfo::of(n::COUNT, &[t::UNSIGNED_INT]),
    PropertyTypeInfo::of(n::UNTIL, &[t::LOCAL_DATE_TIME]),
    PropertyTypeInfo::of(n::DAY, &[t::STRING]),
    PropertyTypeInfo::of(n::NTH_OF_PERIOD, &[t::INT]),
];

static TYPES: &[(&str, FactoryId)] = &[
    (t::EVENT, FactoryId::CalendarObject),
    (t::TASK, FactoryId::CalendarObject),
    (t::GROUP, FactoryId::CalendarObject),
    (t::PATCH_OBJECT, FactoryId::Override),
    (t::LOCAL_DATE_TIME, FactoryId::LocalDateTime),
    (t::LOCATION, FactoryId::TypedObject),
    (t::VIRTUAL_LOCATION, FactoryId::TypedObject),
    (t::LINK, FactoryId::TypedObject),
    (t::PARTICIPANT, FactoryId::TypedObject),
    (t::RELATION, FactoryId::TypedObject),
    (t::ALERT, FactoryId::TypedObject),
    (t::OFFSET_TRIGGER, FactoryId::TypedObject),
    (t::ABSOLUTE_TRIGGER, FactoryId::TypedObject),
    (t::UNKNOWN_TRIGGER, FactoryId::TypedObject),
    (t::RECURRENCE_RULE, FactoryId::TypedObject),
    (t::NDAY, FactoryId::TypedObject),
];

/// ## Summary
/// Looks up the registry entry for a property name.
#[must_use]
pub fn property_type_info(name: &str) -> Option<&'static PropertyTypeInfo> {
    PROPERTIES.iter().find(|info| info.name == name)
}

/// ## Summary
/// Looks up the registry entry for a type name.
///
/// Scalar types have no entry and are wrapped generically. Collection types
/// resolve to the map or list factory from their shape.
#[must_use]
pub fn type_info(type_name: &str) -> Option<TypeInfo> {
    if let Some(shape) = collection_shape(type_name) {
        let factory = match shape {
            CollectionShape::Map { .. } => FactoryId::Map,
            CollectionShape::Set | CollectionShape::Array { .. } => FactoryId::List,
        };
        return Some(TypeInfo {
            factory: Some(factory),
        });
    }

    TYPES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, factory)| TypeInfo {
            factory: Some(*factory),
        })
}

/// ## Summary
/// Parses a bracket-notation collection type.
///
/// Returns `None` for non-collection types.
#[must_use]
pub fn collection_shape(type_name: &str) -> Option<CollectionShape<'_>> {
    if let Some(element) = type_name.strip_suffix("[]") {
        return Some(CollectionShape::Array { element });
    }

    let (key, rest) = type_name.split_once('[')?;
    let element = rest.strip_suffix(']')?;
    if key.is_empty() || element.is_empty() {
        return None;
    }

    if key == STRING && element == BOOLEAN {
        Some(CollectionShape::Set)
    } else {
        Some(CollectionShape::Map { key, element })
    }
}

/// Splits an element type into its alternatives, e.g. `Event|Task`.
pub fn alternatives(element: &str) -> impl Iterator<Item = &str> {
    element.split(ALTERNATIVE_SEPARATOR)
}
