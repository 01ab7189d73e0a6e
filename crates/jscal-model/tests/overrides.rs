//! Recurrence override scenarios driven through the public API.

use chrono::NaiveDateTime;
use jscal_model::model::{Node, Value};
use jscal_model::{Mapper, ModelError};
use serde_json::json;

const RID: &str = "2024-01-08T09:00:00";

fn rid() -> NaiveDateTime {
    NaiveDateTime::parse_from_str(RID, "%Y-%m-%dT%H:%M:%S").expect("valid recurrence id")
}

fn standup() -> Value {
    let input = json!({
        "@type": "Event",
        "uid": "E1",
        "summary": "Standup",
        "start": "2024-01-01T09:00:00",
        "location": {"name": "Room 1"},
        "recurrenceRules": [{"@type": "RecurrenceRule", "frequency": "weekly"}],
        "recurrenceOverrides": {
            RID: {"summary": "Standup (moved)"}
        }
    });
    Mapper::default().parse(&input.to_string()).expect("parses")
}

/// Regenerates the patch object of the override at [`RID`].
fn patches(master: &mut Value) -> Node {
    let mut event = master.as_calendar_object().expect("event");
    let mut overrides = event
        .recurrence_overrides(false)
        .expect("map")
        .expect("present");
    let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");
    occurrence.value_mut().pre_write().expect("pre_write");
    occurrence.delta().expect("delta").to_node()
}

#[test_log::test]
fn binding_synthesizes_the_occurrence() {
    let mut master = standup();
    let mut event = master.as_calendar_object().expect("event");
    let mut overrides = event
        .recurrence_overrides(false)
        .expect("map")
        .expect("present");
    let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");

    assert!(occurrence.is_bound());
    assert_eq!(occurrence.uid().expect("uid"), Some("E1"));
    assert_eq!(occurrence.recurrence_id(), Some(RID));
    assert_eq!(
        occurrence.value().string_property("summary").expect("summary"),
        Some("Standup (moved)")
    );
    assert!(!occurrence.value().has_property("recurrenceRules"));
    assert!(!occurrence.value().has_property("recurrenceOverrides"));

    let start = occurrence
        .value_mut()
        .property_value("start")
        .expect("object")
        .expect("synthesized");
    assert!(start.override_generated());
}

#[test_log::test]
fn unchanged_occurrence_writes_one_patch() {
    let mut master = standup();
    assert_eq!(patches(&mut master), json!({"summary": "Standup (moved)"}));

    // Idempotent
    assert_eq!(patches(&mut master), json!({"summary": "Standup (moved)"}));
}

#[test_log::test]
fn nested_edit_writes_a_path_patch() {
    let mut master = standup();
    {
        let mut event = master.as_calendar_object().expect("event");
        let mut overrides = event
            .recurrence_overrides(false)
            .expect("map")
            .expect("present");
        let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");
        occurrence
            .value_mut()
            .property_value("location")
            .expect("object")
            .expect("present")
            .set_string_property("name", "Room 2")
            .expect("set");
    }

    let delta = patches(&mut master);
    assert_eq!(
        delta,
        json!({"summary": "Standup (moved)", "location/name": "Room 2"})
    );
    assert!(delta.get("location").is_none());
}

#[test_log::test]
fn moving_the_start_writes_a_start_patch() {
    let mut master = standup();
    let moved = NaiveDateTime::parse_from_str("2024-01-08T11:00:00", "%Y-%m-%dT%H:%M:%S")
        .expect("valid");
    {
        let mut event = master.as_calendar_object().expect("event");
        let mut overrides = event
            .recurrence_overrides(false)
            .expect("map")
            .expect("present");
        let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");
        occurrence
            .occurrence()
            .set_start(&moved)
            .expect("set");
        assert_eq!(occurrence.occurrence().start().expect("start"), Some(moved));
    }

    assert_eq!(
        patches(&mut master),
        json!({"summary": "Standup (moved)", "start": "2024-01-08T11:00:00"})
    );

    let written = master.write_node().expect("writes");
    assert_eq!(
        written["recurrenceOverrides"][RID]["start"],
        json!("2024-01-08T11:00:00")
    );
}

#[test]
fn failed_binding_keeps_the_patch_object() {
    let mut input = standup().to_node();
    input["recurrenceOverrides"][RID] = json!({"title": "Moved", "locations/l9/name": "x"});
    let mut master = Mapper::default()
        .parse(&input.to_string())
        .expect("parses");
    {
        let mut event = master.as_calendar_object().expect("event");
        let mut overrides = event
            .recurrence_overrides(false)
            .expect("map")
            .expect("present");
        assert!(matches!(
            overrides.get(&rid()),
            Err(ModelError::UndefinedProperty(path)) if path == "locations/l9/name"
        ));
    }

    let written = master.write_node().expect("writes");
    assert_eq!(
        written["recurrenceOverrides"][RID],
        json!({"title": "Moved", "locations/l9/name": "x"})
    );
}

#[test]
fn written_master_carries_patch_objects() {
    let mut master = standup();
    {
        let mut event = master.as_calendar_object().expect("event");
        let mut overrides = event
            .recurrence_overrides(false)
            .expect("map")
            .expect("present");
        let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");
        occurrence.mark_excluded().expect("excluded");
        occurrence
            .value_mut()
            .remove_property("location")
            .expect("removed");
    }

    let text = Mapper::default()
        .write_value_as_string(&mut master)
        .expect("writes");
    let written: Node = serde_json::from_str(&text).expect("valid json");
    assert_eq!(
        written["recurrenceOverrides"][RID],
        json!({"summary": "Standup (moved)", "excluded": true, "location": null})
    );
    assert_eq!(written["summary"], json!("Standup"));
}

#[test]
fn overrides_are_guarded() {
    let mut master = standup();
    let snapshot = master.to_node();
    let mut event = master.as_calendar_object().expect("event");
    let mut overrides = event
        .recurrence_overrides(false)
        .expect("map")
        .expect("present");
    let mut occurrence = overrides.get(&rid()).expect("bound").expect("present");

    assert!(matches!(
        occurrence.set_master(snapshot),
        Err(ModelError::AlreadyBound(id)) if id == RID
    ));
    assert!(matches!(
        occurrence.set_uid("E2"),
        Err(ModelError::ImmutableProperty(_))
    ));
    assert!(matches!(
        occurrence.occurrence().make_relation("E0"),
        Err(ModelError::ImmutableProperty(_))
    ));
}

#[test]
fn new_overrides_start_empty() {
    let mut master = standup();
    let other = NaiveDateTime::parse_from_str("2024-01-15T09:00:00", "%Y-%m-%dT%H:%M:%S")
        .expect("valid");
    {
        let mut event = master.as_calendar_object().expect("event");
        let mut overrides = event
            .recurrence_overrides(false)
            .expect("map")
            .expect("present");
        let mut occurrence = overrides.make_override(&other).expect("created");
        occurrence
            .occurrence()
            .set_title("Retro")
            .expect("set");
        assert_eq!(overrides.keys().expect("keys"), vec![rid(), other]);
    }

    let written = master.write_node().expect("writes");
    assert_eq!(
        written["recurrenceOverrides"]["2024-01-15T09:00:00"],
        json!({"title": "Retro"})
    );
}
