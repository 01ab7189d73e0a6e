//! Type resolution and construction through the public API.

use jscal_model::ModelError;
use jscal_model::model::{Factory, ListForm, ObjectKind, Variant};
use serde_json::json;

#[test]
fn calendar_objects_need_a_known_discriminator() {
    let factory = Factory::global();

    assert!(matches!(
        factory.make_calendar_object(json!({"uid": "E1"})),
        Err(ModelError::Type(_))
    ));
    assert!(matches!(
        factory.make_calendar_object(json!({"@type": 7})),
        Err(ModelError::Type(_))
    ));
    assert!(matches!(
        factory.make_calendar_object(json!({"@type": "Journal"})),
        Err(ModelError::UnsupportedType(_))
    ));

    let task = factory
        .make_calendar_object(json!({"@type": "Task", "uid": "T1"}))
        .expect("task");
    assert!(matches!(task.variant(), Variant::CalendarObject(ObjectKind::Task)));
}

#[test]
fn members_resolve_lazily() {
    let mut event = Factory::global()
        .make_calendar_object(json!({
            "@type": "Event",
            "keywords": {"a": true},
            "comments": ["one"],
            "location": {"name": "Room 1"}
        }))
        .expect("event");

    assert!(matches!(
        event.property_value("keywords").expect("object").expect("present").variant(),
        Variant::List(ListForm::Set)
    ));
    assert!(matches!(
        event.property_value("comments").expect("object").expect("present").variant(),
        Variant::List(ListForm::Array)
    ));

    let unregistered = event.property_value("location").expect("object").expect("present");
    assert_eq!(unregistered.type_name(), "unknown");
    assert!(unregistered.is_object());
}

#[test]
fn group_entries_must_be_events_or_tasks() {
    let mut group = Factory::global()
        .make_calendar_object(json!({
            "@type": "Group",
            "entries": {
                "E1": {"@type": "Event"},
                "L1": {"@type": "Location"},
                "X1": {"title": "no type"}
            }
        }))
        .expect("group");
    let entries = group.property_value("entries").expect("object").expect("present");

    assert_eq!(
        entries.property_value("E1").expect("resolves").expect("present").type_name(),
        "Event"
    );
    assert!(matches!(
        entries.property_value("L1"),
        Err(ModelError::InvalidType { .. })
    ));
    assert!(matches!(entries.property_value("X1"), Err(ModelError::Type(_))));
}

#[test]
fn copies_are_independent() {
    let mut original = Factory::global()
        .make_calendar_object(json!({
            "@type": "Event",
            "uid": "E1",
            "locations": {"l1": {"@type": "Location", "name": "Room 1"}}
        }))
        .expect("event");
    let before = original.to_node();

    let mut copy = original.copy();
    assert_eq!(copy.to_node(), before);

    copy.property_value("locations")
        .expect("object")
        .expect("present")
        .property_value("l1")
        .expect("object")
        .expect("present")
        .set_string_property("name", "Room 2")
        .expect("set");

    assert_eq!(original.to_node(), before);
    assert_ne!(copy.to_node(), before);
    assert!(!original.has_changes());
}
