//! List and map views through the public API.

use jscal_model::model::{Factory, List, Map};
use serde_json::json;

#[test]
fn list_keeps_insertion_order() {
    let mut value = Factory::global().make_value("comments", None).expect("list");
    let mut list: List<'_, String> = List::new(&mut value).expect("view");

    list.add(&"x".to_string()).expect("add");
    list.add(&"y".to_string()).expect("add");

    assert_eq!(list.get().expect("elements"), vec!["x", "y"]);
    assert_eq!(list.size(), 2);
    assert_eq!(value.to_node(), json!(["x", "y"]));
}

#[test]
fn string_sets_ignore_duplicates() {
    let mut value = Factory::global().make_value("keywords", None).expect("set");
    let mut set: List<'_, String> = List::new(&mut value).expect("view");

    set.add(&"work".to_string()).expect("add");
    set.add(&"work".to_string()).expect("add");
    assert_eq!(set.size(), 1);
    assert!(set.remove(&"work".to_string()).expect("remove"));
    assert!(set.is_empty());
}

#[test]
fn map_entries_resolve_to_element_type() {
    let mut event = Factory::global()
        .make_calendar_object(json!({
            "@type": "Event",
            "locations": {"l1": {"@type": "Location", "name": "Room 1"}}
        }))
        .expect("event");
    let mut calendar = event.as_calendar_object().expect("view");
    let mut locations = calendar.locations(false).expect("map").expect("present");

    assert_eq!(locations.element_type(), "Location");
    assert_eq!(locations.keys().expect("keys"), vec!["l1".to_string()]);

    let entry = locations.make_entry(&"l2".to_string()).expect("entry");
    entry.set_string_property("name", "Room 2").expect("set");
    assert_eq!(locations.size(), 2);

    let removed = locations.remove(&"l1".to_string()).expect("removed");
    assert!(removed.is_some());
    assert_eq!(
        calendar.value().to_node()["locations"],
        json!({"l2": {"@type": "Location", "name": "Room 2"}})
    );
}

#[test]
fn make_helpers_key_by_fresh_ids() {
    let mut event = Factory::global().new_value("Event").expect("event");
    let mut calendar = event.as_calendar_object().expect("view");

    let id = calendar
        .make_participant()
        .expect("participant")
        .id()
        .map(str::to_string)
        .expect("keyed");
    assert!(uuid_like(&id));

    let map: Map<'_, String> = calendar.participants(false).expect("map").expect("present");
    assert!(map.contains(&id));
}

fn uuid_like(text: &str) -> bool {
    text.len() == 36 && text.chars().filter(|c| *c == '-').count() == 4
}
