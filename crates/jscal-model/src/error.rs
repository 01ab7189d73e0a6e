use thiserror::Error;

/// Object model errors.
///
/// None of these are retried internally. A failed mutation may leave its
/// target partially updated; callers should discard the object.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Missing or non-textual discriminator, or a type that cannot be
    /// determined from the node.
    #[error("Type error: {0}")]
    Type(String),

    #[error("Unknown or unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Invalid type {found} for {property}: expected one of {allowed:?}")]
    InvalidType {
        property: String,
        found: String,
        allowed: Vec<String>,
    },

    #[error("Not an object: {0}")]
    NotAnObject(String),

    #[error("Wrong kind for {name}: expected {expected}, found {found}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Master already set for override {0}")]
    AlreadyBound(String),

    #[error("Property {0} cannot be changed in an override")]
    ImmutableProperty(String),

    #[error("Undefined property {0}")]
    UndefinedProperty(String),

    #[error("Failed to initialise {factory} factory: {reason}")]
    FactoryInit {
        factory: &'static str,
        reason: String,
    },

    #[error("Invalid local date-time {value:?}: {source}")]
    DateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown time zone: {0}")]
    TimeZone(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    CoreError(#[from] jscal_core::error::CoreError),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
