use serde_json::json;

use super::require_type;
use crate::error::ModelResult;
use crate::model::core::Value;
use crate::model::factory::Factory;
use crate::model::registry::{names, types};

/// A reminder attached to a calendar object.
#[derive(Debug)]
pub struct Alert<'a> {
    value: &'a mut Value,
}

impl<'a> Alert<'a> {
    /// ## Summary
    /// Wraps an `Alert` value.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other type.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        Ok(Self {
            value: require_type(value, types::ALERT)?,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.value.parent_property()
    }

    string_accessors! {
        action, set_action => names::ACTION;
        acknowledged, set_acknowledged => names::ACKNOWLEDGED;
    }

    /// ## Summary
    /// Returns the trigger type: `OffsetTrigger`, `AbsoluteTrigger` or
    /// `UnknownTrigger`.
    ///
    /// ## Errors
    /// Returns `Type` or `InvalidType` if the trigger's discriminator is
    /// missing or not a trigger type.
    pub fn trigger_type(&mut self) -> ModelResult<Option<&str>> {
        Ok(self
            .value
            .property_value(names::TRIGGER)?
            .map(|trigger| trigger.type_name()))
    }

    /// ## Summary
    /// Triggers the alert at a signed duration from the start or end.
    ///
    /// ## Errors
    /// Returns a resolution error if the trigger cannot be built.
    pub fn set_offset_trigger(
        &mut self,
        offset: &str,
        relative_to: Option<&str>,
    ) -> ModelResult<()> {
        let mut node = json!({"@type": types::OFFSET_TRIGGER, "offset": offset});
        if let Some(relative_to) = relative_to {
            node[names::RELATIVE_TO] = json!(relative_to);
        }
        self.set_trigger(node)
    }

    /// ## Summary
    /// Triggers the alert at a fixed UTC time.
    ///
    /// ## Errors
    /// Returns a resolution error if the trigger cannot be built.
    pub fn set_absolute_trigger(&mut self, when: &str) -> ModelResult<()> {
        self.set_trigger(json!({"@type": types::ABSOLUTE_TRIGGER, "when": when}))
    }

    fn set_trigger(&mut self, node: serde_json::Value) -> ModelResult<()> {
        let trigger = Factory::global().make_property(names::TRIGGER, Some(node))?;
        self.value.set_property(trigger)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_resolve_by_discriminator() {
        let mut value = Factory::global().new_value(types::ALERT).expect("alert");
        let mut alert = Alert::new(&mut value).expect("view");

        alert.set_offset_trigger("-PT15M", Some("start")).expect("set");
        assert_eq!(alert.trigger_type().expect("trigger"), Some(types::OFFSET_TRIGGER));

        alert.set_absolute_trigger("2024-01-08T08:45:00Z").expect("set");
        assert_eq!(alert.trigger_type().expect("trigger"), Some(types::ABSOLUTE_TRIGGER));

        assert_eq!(
            value.to_node(),
            json!({
                "@type": "Alert",
                "trigger": {"@type": "AbsoluteTrigger", "when": "2024-01-08T08:45:00Z"}
            })
        );
    }
}
