use super::require_type;
use crate::error::ModelResult;
use crate::model::collections::{List, Map};
use crate::model::core::Value;
use crate::model::registry::{names, types};

/// An attendee, organizer or other party to a calendar object.
#[derive(Debug)]
pub struct Participant<'a> {
    value: &'a mut Value,
}

impl<'a> Participant<'a> {
    /// ## Summary
    /// Wraps a `Participant` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::PARTICIPANT)?,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.value.parent_property()
    }

    string_accessors! {
        name, set_name => names::NAME;
        email, set_email => names::EMAIL;
        description, set_description => names::DESCRIPTION;
        kind, set_kind => names::KIND;
        language, set_language => names::LANGUAGE;
        location_id, set_location_id => names::LOCATION_ID;
        invited_by, set_invited_by => names::INVITED_BY;
        participation_status, set_participation_status => names::PARTICIPATION_STATUS;
        participation_comment, set_participation_comment => names::PARTICIPATION_COMMENT;
        schedule_agent, set_schedule_agent => names::SCHEDULE_AGENT;
    }

    /// ## Summary
    /// Returns whether a reply is expected, `false` when absent.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a boolean.
    pub fn expect_reply(&self) -> ModelResult<bool> {
        self.value.boolean_property(names::EXPECT_REPLY)
    }

    /// ## Summary
    /// Sets whether a reply is expected.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the participant is not an object.
    pub fn set_expect_reply(&mut self, val: bool) -> ModelResult<()> {
        self.value.set_boolean_property(names::EXPECT_REPLY, val)
    }

    /// ## Summary
    /// Returns the role set, creating it when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn roles(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.value
            .value_for(names::ROLES, create)?
            .map(List::new)
            .transpose()
    }

    /// ## Summary
    /// Returns the method to URI map used to reach this participant.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn send_to(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.value
            .value_for(names::SEND_TO, create)?
            .map(Map::new)
            .transpose()
    }
}
