//! Accessors shared by Event, Task, Group and override occurrences.

use std::str::FromStr;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use jscal_core::config::get_config;

use super::{Alert, Link, Location, Participant, RecurrenceRule, Relation, VirtualLocation};
use crate::error::{ModelError, ModelResult};
use crate::model::collections::{List, Map, MapKey, parse_local_date_time};
use crate::model::core::{Node, ObjectKind, Property, Value, Variant};
use crate::model::factory::Factory;
use crate::model::overrides::RecurrenceOverrides;
use crate::model::registry::{names, types};

/// View over a calendar object or an override occurrence.
#[derive(Debug)]
pub struct CalendarObject<'a> {
    value: &'a mut Value,
}

/// Inserts a fresh `type_name` entry under `key` into the map at `name`.
fn make_keyed<'v>(
    value: &'v mut Value,
    name: &str,
    key: String,
    type_name: &str,
) -> ModelResult<&'v mut Value> {
    let entry = Factory::global().new_value(type_name)?;
    let map = value
        .value_for(name, true)?
        .ok_or_else(|| ModelError::UndefinedProperty(name.to_string()))?;
    map.set_property(Property::new(key, entry))?.value()
}

fn generate_id() -> String {
    get_config().ids.version.generate().to_string()
}

impl<'a> CalendarObject<'a> {
    /// ## Summary
    /// Wraps an Event, Task or Group value, or an override.
    ///
    /// ## Errors
    /// Returns `WrongKind` for any other value.
    pub fn new(value: &'a mut Value) -> ModelResult<Self> {
        match value.variant {
            Variant::CalendarObject(_) | Variant::Override(_) => Ok(Self { value }),
            _ => Err(ModelError::WrongKind {
                name: value.type_name().to_string(),
                expected: "calendar object",
                found: value.variant.name(),
            }),
        }
    }

    pub(crate) fn from_override(value: &'a mut Value) -> Self {
        Self { value }
    }

    /// ## Summary
    /// Returns the object kind. An override has the kind of its master.
    ///
    /// ## Errors
    /// Returns `Type` if an unbound override has no discriminator, and
    /// `UnsupportedType` if it names something else.
    pub fn kind(&self) -> ModelResult<ObjectKind> {
        if let Variant::CalendarObject(kind) = self.value.variant {
            return Ok(kind);
        }
        let type_name = self
            .value
            .string_property(names::TYPE)?
            .ok_or_else(|| ModelError::Type(format!("missing {}", names::TYPE)))?;
        ObjectKind::from_type(type_name)
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        matches!(self.value.variant, Variant::Override(_))
    }

    string_accessors! {
        uid, set_uid => names::UID;
        prod_id, set_prod_id => names::PROD_ID;
        method, set_method => names::METHOD;
        title, set_title => names::TITLE;
        description, set_description => names::DESCRIPTION;
        description_content_type, set_description_content_type => names::DESCRIPTION_CONTENT_TYPE;
        locale, set_locale => names::LOCALE;
        color, set_color => names::COLOR;
        privacy, set_privacy => names::PRIVACY;
        status, set_status => names::STATUS;
        free_busy_status, set_free_busy_status => names::FREE_BUSY_STATUS;
        duration, set_duration => names::DURATION;
        estimated_duration, set_estimated_duration => names::ESTIMATED_DURATION;
        progress, set_progress => names::PROGRESS;
        source, set_source => names::SOURCE;
    }

    fn date_time(&self, name: &str) -> ModelResult<Option<NaiveDateTime>> {
        self.value
            .string_property(name)?
            .map(parse_local_date_time)
            .transpose()
    }

    fn set_date_time(&mut self, name: &str, val: &NaiveDateTime) -> ModelResult<()> {
        self.value
            .set_scalar_property(name, Node::String(val.to_field_name()))
    }

    /// ## Summary
    /// Returns the start as a local date-time.
    ///
    /// ## Errors
    /// Returns `DateTime` if the stored text is not a local date-time.
    pub fn start(&self) -> ModelResult<Option<NaiveDateTime>> {
        self.date_time(names::START)
    }

    /// ## Summary
    /// Sets the start.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this object is not object-shaped.
    pub fn set_start(&mut self, start: &NaiveDateTime) -> ModelResult<()> {
        self.set_date_time(names::START, start)
    }

    /// ## Summary
    /// Returns the due date-time of a task.
    ///
    /// ## Errors
    /// Returns `DateTime` if the stored text is not a local date-time.
    pub fn due(&self) -> ModelResult<Option<NaiveDateTime>> {
        self.date_time(names::DUE)
    }

    /// ## Summary
    /// Sets the due date-time of a task.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this object is not object-shaped.
    pub fn set_due(&mut self, due: &NaiveDateTime) -> ModelResult<()> {
        self.set_date_time(names::DUE, due)
    }

    /// ## Summary
    /// Returns the time zone.
    ///
    /// ## Errors
    /// Returns `TimeZone` if the stored id is not a known time zone.
    pub fn time_zone(&self) -> ModelResult<Option<Tz>> {
        self.value
            .string_property(names::TIME_ZONE)?
            .map(|id| Tz::from_str(id).map_err(|_err| ModelError::TimeZone(id.to_string())))
            .transpose()
    }

    /// ## Summary
    /// Sets the time zone from an IANA id.
    ///
    /// ## Errors
    /// Returns `TimeZone` if the id is not a known time zone.
    pub fn set_time_zone(&mut self, id: &str) -> ModelResult<()> {
        let tz = Tz::from_str(id).map_err(|_err| ModelError::TimeZone(id.to_string()))?;
        self.value.set_string_property(names::TIME_ZONE, tz.name())
    }

    /// ## Summary
    /// Returns the sequence number.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an unsigned integer.
    pub fn sequence(&self) -> ModelResult<Option<u32>> {
        self.value.unsigned_property(names::SEQUENCE)
    }

    /// ## Summary
    /// Sets the sequence number.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this object is not object-shaped.
    pub fn set_sequence(&mut self, sequence: u32) -> ModelResult<()> {
        self.value.set_unsigned_property(names::SEQUENCE, sequence)
    }

    /// ## Summary
    /// Returns the completion percentage of a task.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an unsigned integer.
    pub fn percent_complete(&self) -> ModelResult<Option<u32>> {
        self.value.unsigned_property(names::PERCENT_COMPLETE)
    }

    /// ## Summary
    /// Sets the completion percentage of a task.
    ///
    /// ## Errors
    /// Returns `NotAnObject` if this object is not object-shaped.
    pub fn set_percent_complete(&mut self, percent: u32) -> ModelResult<()> {
        self.value
            .set_unsigned_property(names::PERCENT_COMPLETE, percent)
    }

    /// ## Summary
    /// Returns whether the object should be shown without a time.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a boolean.
    pub fn show_without_time(&self) -> ModelResult<bool> {
        self.value.boolean_property(names::SHOW_WITHOUT_TIME)
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    fn list<T>(&mut self, name: &str, create: bool) -> ModelResult<Option<List<'_, T>>>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        self.value.value_for(name, create)?.map(List::new).transpose()
    }

    fn map(&mut self, name: &str, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.value.value_for(name, create)?.map(Map::new).transpose()
    }

    /// ## Summary
    /// Returns the keyword set, creating it when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn keywords(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.list(names::KEYWORDS, create)
    }

    /// ## Summary
    /// Returns the category set, creating it when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a set.
    pub fn categories(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.list(names::CATEGORIES, create)
    }

    /// ## Summary
    /// Returns the comments, creating the list when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an array.
    pub fn comments(&mut self, create: bool) -> ModelResult<Option<List<'_, String>>> {
        self.list(names::COMMENTS, create)
    }

    /// ## Summary
    /// Returns the recurrence rules, creating the list when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an array.
    pub fn recurrence_rules(
        &mut self,
        create: bool,
    ) -> ModelResult<Option<List<'_, RecurrenceRule>>> {
        self.list(names::RECURRENCE_RULES, create)
    }

    /// ## Summary
    /// Returns the excluded recurrence rules, creating the list when `create`
    /// is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not an array.
    pub fn excluded_recurrence_rules(
        &mut self,
        create: bool,
    ) -> ModelResult<Option<List<'_, RecurrenceRule>>> {
        self.list(names::EXCLUDED_RECURRENCE_RULES, create)
    }

    /// ## Summary
    /// Returns the overrides keyed by recurrence id. Entries are bound to
    /// a snapshot of this object as it is now.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn recurrence_overrides(
        &mut self,
        create: bool,
    ) -> ModelResult<Option<RecurrenceOverrides<'_>>> {
        let master = self.value.to_node();
        self.value
            .value_for(names::RECURRENCE_OVERRIDES, create)?
            .map(|overrides| RecurrenceOverrides::new(overrides, master))
            .transpose()
    }

    /// ## Summary
    /// Returns the locations keyed by id, creating the map when `create` is set.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn locations(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::LOCATIONS, create)
    }

    /// ## Summary
    /// Returns the virtual locations keyed by id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn virtual_locations(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::VIRTUAL_LOCATIONS, create)
    }

    /// ## Summary
    /// Returns the participants keyed by id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn participants(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::PARTICIPANTS, create)
    }

    /// ## Summary
    /// Returns the links keyed by id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn links(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::LINKS, create)
    }

    /// ## Summary
    /// Returns the alerts keyed by id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn alerts(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::ALERTS, create)
    }

    /// ## Summary
    /// Returns the relations keyed by the related object's uid.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the member is not a map.
    pub fn related_to(&mut self, create: bool) -> ModelResult<Option<Map<'_, String>>> {
        self.map(names::RELATED_TO, create)
    }

    /// ## Summary
    /// Adds an empty location under a new id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if `locations` exists but is not a map.
    pub fn make_location(&mut self) -> ModelResult<Location<'_>> {
        Location::new(make_keyed(self.value, names::LOCATIONS, generate_id(), types::LOCATION)?)
    }

    /// ## Summary
    /// Adds an empty virtual location under a new id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the collection exists but is not a map.
    pub fn make_virtual_location(&mut self) -> ModelResult<VirtualLocation<'_>> {
        VirtualLocation::new(make_keyed(
            self.value,
            names::VIRTUAL_LOCATIONS,
            generate_id(),
            types::VIRTUAL_LOCATION,
        )?)
    }

    /// ## Summary
    /// Adds an empty participant under a new id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the collection exists but is not a map.
    pub fn make_participant(&mut self) -> ModelResult<Participant<'_>> {
        Participant::new(make_keyed(
            self.value,
            names::PARTICIPANTS,
            generate_id(),
            types::PARTICIPANT,
        )?)
    }

    /// ## Summary
    /// Adds a link to `href` under a new id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the collection exists but is not a map.
    pub fn make_link(&mut self, href: &str) -> ModelResult<Link<'_>> {
        let entry = make_keyed(self.value, names::LINKS, generate_id(), types::LINK)?;
        let mut link = Link::new(entry)?;
        link.set_href(href)?;
        Ok(link)
    }

    /// ## Summary
    /// Adds an empty alert under a new id.
    ///
    /// ## Errors
    /// Returns `WrongKind` if the collection exists but is not a map.
    pub fn make_alert(&mut self) -> ModelResult<Alert<'_>> {
        Alert::new(make_keyed(self.value, names::ALERTS, generate_id(), types::ALERT)?)
    }

    /// ## Summary
    /// Adds a relation to the object with `uid`, replacing any existing one.
    ///
    /// ## Errors
    /// Returns `ImmutableProperty` on an override, where `relatedTo` is fixed
    /// by the master.
    pub fn make_relation(&mut self, uid: &str) -> ModelResult<Relation<'_>> {
        if self.is_override() {
            return Err(ModelError::ImmutableProperty(names::RELATED_TO.to_string()));
        }
        Relation::new(make_keyed(
            self.value,
            names::RELATED_TO,
            uid.to_string(),
            types::RELATION,
        )?)
    }

    // ------------------------------------------------------------------
    // Group
    // ------------------------------------------------------------------

    /// ## Summary
    /// Returns the entries of a group in document order.
    ///
    /// ## Errors
    /// Returns the first resolution error; an entry whose discriminator is
    /// neither Event nor Task fails with `InvalidType`.
    pub fn entries(&mut self) -> ModelResult<Vec<CalendarObject<'_>>> {
        let Some(entries) = self.value.value_for(names::ENTRIES, false)? else {
            return Ok(Vec::new());
        };

        entries
            .properties_mut()?
            .iter_mut()
            .map(|prop| CalendarObject::new(prop.value()?))
            .collect()
    }

    /// ## Summary
    /// Adds an Event or Task to a group, keyed by its uid.
    ///
    /// ## Errors
    /// - `UnsupportedType` if this is not a group or the entry is a group.
    /// - `Type` if the entry has no uid.
    pub fn add_entry(&mut self, entry: Value) -> ModelResult<CalendarObject<'_>> {
        if !matches!(self.value.variant, Variant::CalendarObject(ObjectKind::Group)) {
            return Err(ModelError::UnsupportedType(format!(
                "entries on {}",
                self.value.type_name()
            )));
        }
        if !matches!(
            entry.variant,
            Variant::CalendarObject(ObjectKind::Event | ObjectKind::Task)
        ) {
            return Err(ModelError::UnsupportedType(format!(
                "{} as a group entry",
                entry.type_name()
            )));
        }

        let uid = entry
            .string_property(names::UID)?
            .ok_or_else(|| ModelError::Type("group entry has no uid".to_string()))?
            .to_string();
        let entries = self
            .value
            .value_for(names::ENTRIES, true)?
            .ok_or_else(|| ModelError::UndefinedProperty(names::ENTRIES.to_string()))?;

        CalendarObject::new(entries.set_property(Property::new(uid, entry))?.value()?)
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
    /// ## Summary
    /// Returns the calendar object view of this value.
    ///
    /// ## Errors
    /// Returns `WrongKind` if this is not a calendar object or override.
    pub fn as_calendar_object(&mut self) -> ModelResult<CalendarObject<'_>> {
        CalendarObject::new(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::model::objects::Frequency;

    fn event() -> Value {
        Factory::global()
            .make_calendar_object(json!({
                "@type": "Event",
                "uid": "E1",
                "title": "Standup",
                "start": "2024-01-01T09:00:00",
                "timeZone": "Europe/Berlin",
                "sequence": 3
            }))
            .expect("event")
    }

    #[test]
    fn scalar_accessors() {
        let mut value = event();
        let mut event = value.as_calendar_object().expect("view");

        assert_eq!(event.kind().expect("kind"), ObjectKind::Event);
        assert_eq!(event.uid().expect("uid"), Some("E1"));
        assert_eq!(event.sequence().expect("sequence"), Some(3));
        assert_eq!(event.time_zone().expect("tz"), Some(chrono_tz::Europe::Berlin));
        assert_eq!(
            event.start().expect("start"),
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(9, 0, 0))
        );

        event.set_title("Daily standup").expect("set");
        event.set_sequence(4).expect("set");
        assert_eq!(event.title().expect("title"), Some("Daily standup"));

        assert!(matches!(
            event.set_time_zone("Mars/Olympus"),
            Err(ModelError::TimeZone(_))
        ));
    }

    #[test]
    fn fresh_objects() {
        let mut value = Factory::global().new_value(types::TASK).expect("task");
        let mut task = value.as_calendar_object().expect("view");
        task.set_uid("T1").expect("set");
        task.set_percent_complete(40).expect("set");
        let due = NaiveDate::from_ymd_opt(2024, 2, 1).and_then(|d| d.and_hms_opt(17, 0, 0));
        task.set_due(&due.expect("valid date")).expect("set");

        assert_eq!(task.kind().expect("kind"), ObjectKind::Task);
        assert_eq!(
            value.to_node(),
            json!({"@type": "Task", "uid": "T1", "percentComplete": 40, "due": "2024-02-01T17:00:00"})
        );
    }

    #[test]
    fn nested_collections() {
        let mut value = event();
        let mut event = value.as_calendar_object().expect("view");

        let id = {
            let mut location = event.make_location().expect("location");
            location.set_name("Room 1").expect("set");
            location.id().map(str::to_string).expect("keyed")
        };
        event.make_link("https://example.com/agenda").expect("link");
        event.make_relation("E0").expect("relation");
        event
            .keywords(true)
            .expect("created")
            .expect("present")
            .add(&"daily".to_string())
            .expect("add");
        event
            .recurrence_rules(true)
            .expect("created")
            .expect("present")
            .add(&RecurrenceRule::new(Frequency::Weekly))
            .expect("add");

        let mut locations = event.locations(false).expect("map").expect("present");
        let location = locations.get(&id).expect("lookup").expect("present");
        assert_eq!(location.string_property(names::NAME).expect("name"), Some("Room 1"));

        assert_eq!(event.links(false).expect("map").expect("present").size(), 1);
        assert!(event.related_to(false).expect("map").expect("present").contains(&"E0".to_string()));
        assert_eq!(
            event
                .recurrence_rules(false)
                .expect("list")
                .expect("present")
                .get()
                .expect("rules"),
            vec![RecurrenceRule::new(Frequency::Weekly)]
        );
        assert!(event.participants(false).expect("absent").is_none());
    }

    #[test]
    fn group_entries() {
        let mut value = Factory::global()
            .make_calendar_object(json!({
                "@type": "Group",
                "uid": "G1",
                "entries": {
                    "E1": {"@type": "Event", "uid": "E1"},
                    "T1": {"@type": "Task", "uid": "T1"}
                }
            }))
            .expect("group");
        let mut group = value.as_calendar_object().expect("view");

        let kinds: Vec<ObjectKind> = group
            .entries()
            .expect("entries")
            .iter()
            .map(|entry| entry.kind().expect("kind"))
            .collect();
        assert_eq!(kinds, vec![ObjectKind::Event, ObjectKind::Task]);

        let extra = Factory::global()
            .make_calendar_object(json!({"@type": "Event", "uid": "E2"}))
            .expect("event");
        group.add_entry(extra).expect("added");
        assert_eq!(group.entries().expect("entries").len(), 3);

        let nested = Factory::global().new_value(types::GROUP).expect("group");
        assert!(matches!(
            group.add_entry(nested),
            Err(ModelError::UnsupportedType(_))
        ));
    }

    #[test]
    fn group_rejects_other_entry_types() {
        let mut value = Factory::global()
            .make_calendar_object(json!({
                "@type": "Group",
                "entries": {"G2": {"@type": "Group"}}
            }))
            .expect("group");
        let mut group = value.as_calendar_object().expect("view");
        assert!(matches!(group.entries(), Err(ModelError::InvalidType { .. })));
    }
}
