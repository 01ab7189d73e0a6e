//! Type names as they appear in discriminators and in the property table.

// Calendar objects
pub const EVENT: &str = "Event";
pub const TASK: &str = "Task";
pub const GROUP: &str = "Group";
/// Element type of `recurrenceOverrides`, materialized as an override.
pub const PATCH_OBJECT: &str = "PatchObject";

// Scalars
pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const INT: &str = "Int";
pub const UNSIGNED_INT: &str = "UnsignedInt";
pub const ID: &str = "Id";
pub const LOCAL_DATE_TIME: &str = "LocalDateTime";
pub const UTC_DATE_TIME: &str = "UTCDateTime";
pub const DURATION: &str = "Duration";
pub const SIGNED_DURATION: &str = "SignedDuration";
pub const TIME_ZONE_ID: &str = "TimeZoneId";
/// Deletion marker in patch objects.
pub const NULL: &str = "Null";
/// Fallback for members with no registry entry and no discriminator.
pub const UNKNOWN: &str = "unknown";

// Nested objects
pub const LOCATION: &str = "Location";
pub const VIRTUAL_LOCATION: &str = "VirtualLocation";
pub const LINK: &str = "Link";
pub const PARTICIPANT: &str = "Participant";
pub const RELATION: &str = "Relation";
pub const ALERT: &str = "Alert";
pub const OFFSET_TRIGGER: &str = "OffsetTrigger";
pub const ABSOLUTE_TRIGGER: &str = "AbsoluteTrigger";
pub const UNKNOWN_TRIGGER: &str = "UnknownTrigger";
pub const RECURRENCE_RULE: &str = "RecurrenceRule";
pub const NDAY: &str = "NDay";

/// Separates alternatives in a collection element type, e.g. `Id[Event|Task]`.
pub const ALTERNATIVE_SEPARATOR: char = '|';
