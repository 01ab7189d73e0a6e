//! Occurrence synthesis: master copy plus patch application.

use jscal_core::config::get_config;
use jscal_core::constants::PATH_SEPARATOR;

use super::OverrideState;
use super::patch::split_path;
use crate::error::{ModelError, ModelResult};
use crate::model::core::{Node, Property, Value, Variant};
use crate::model::factory::Factory;
use crate::model::registry::{self, RECURRENCE_COLLECTIONS, names, types};

/// A patch applied after the whole-value members.
struct Deferred<'n> {
    path: &'n str,
    /// `None` deletes the target.
    node: Option<&'n Node>,
}

/// ## Summary
/// Binds an override to its master and synthesizes the occurrence.
///
/// The override's content is set aside as its delta and replaced by a copy of
/// the master without its recurrence collections. Whole-value members of the
/// delta replace the copied ones; null members and `a/b` paths are applied
/// afterwards. `start` (unless the delta sets it) and `recurrenceId` are then
/// synthesized from the recurrence id and flagged as override-generated.
///
/// Immutable members of the delta are skipped with a warning, or rejected
/// when `overrides.strict_immutable` is set.
///
/// The occurrence is assembled apart from the override and installed only
/// once every step has succeeded; on error the override keeps its delta.
///
/// ## Errors
/// - `AlreadyBound` if the override was bound before.
/// - `Type` if the override is not stored under a recurrence id.
/// - `DateTime` if the recurrence id is not a local date-time.
/// - `NotAnObject` if the master is not an object.
/// - `UndefinedProperty` if a patch path does not resolve.
/// - `ImmutableProperty` for an immutable member in strict mode.
pub(crate) fn bind(value: &mut Value, master: Node) -> ModelResult<()> {
    bind_with(value, master, get_config().overrides.strict_immutable)
}

fn bind_with(value: &mut Value, master: Node, strict: bool) -> ModelResult<()> {
    let Variant::Override(state) = &value.variant else {
        return Err(ModelError::WrongKind {
            name: value.type_name().to_string(),
            expected: "override",
            found: value.variant.name(),
        });
    };

    let rid = value
        .parent_property
        .clone()
        .ok_or_else(|| ModelError::Type("override is not held by a recurrence id".to_string()))?;
    if state.is_bound() {
        return Err(ModelError::AlreadyBound(rid));
    }
    if !master.is_object() {
        return Err(ModelError::NotAnObject(format!("master of override {rid}")));
    }

    let factory = Factory::global();
    let mut recurrence_id = factory.local_date_time(&rid)?;
    recurrence_id.mark_override_generated();

    let delta_node = value.content_node();
    let Node::Object(members) = &delta_node else {
        return Err(ModelError::NotAnObject(format!("patch object {rid}")));
    };

    let mut occurrence = Value::new(value.type_name(), master.clone());
    for name in RECURRENCE_COLLECTIONS {
        occurrence.take_property(name)?;
    }

    let mut deferred = Vec::new();
    let mut start_seen = false;
    let mut time_zone = None;

    for (name, node) in members {
        let head = name.split(PATH_SEPARATOR).next().unwrap_or(name);
        if registry::is_immutable(head) {
            if strict {
                return Err(ModelError::ImmutableProperty(name.clone()));
            }
            tracing::warn!(
                recurrence_id = %rid,
                property = %name,
                "Skipping immutable property in override"
            );
            continue;
        }

        if node.is_null() {
            deferred.push(Deferred { path: name, node: None });
            continue;
        }

        if name == names::START {
            start_seen = true;
        }
        if name == names::TIME_ZONE {
            time_zone = node.as_str().map(str::to_string);
        }

        if name.contains(PATH_SEPARATOR) {
            deferred.push(Deferred {
                path: name,
                node: Some(node),
            });
            continue;
        }

        occurrence.insert_property(factory.make_property(name, Some(node.clone()))?)?;
    }

    let mut deleted = Vec::new();
    for patch in &deferred {
        if let Some(name) = apply_patch(&mut occurrence, patch)? {
            deleted.push(name);
        }
    }

    if !start_seen {
        let mut start = factory.local_date_time(&rid)?;
        start.mark_override_generated();
        occurrence.insert_property(Property::new(names::START, start))?;
    }
    occurrence.insert_property(Property::new(names::RECURRENCE_ID, recurrence_id))?;

    tracing::debug!(
        recurrence_id = %rid,
        members = members.len(),
        deferred = deferred.len(),
        synthesized_start = !start_seen,
        "Bound override to master"
    );

    let Value { body, changed, .. } = occurrence;
    value.body = body;
    value.changed |= changed;

    if let Variant::Override(state) = &mut value.variant {
        **state = OverrideState {
            master: Some(master),
            recurrence_id: Some(rid),
            delta: Some(Value::new(types::PATCH_OBJECT, delta_node)),
            deleted,
            time_zone,
        };
    }

    Ok(())
}

/// Applies one deferred patch to the occurrence. Returns the member name when
/// a top-level member was deleted.
fn apply_patch(occurrence: &mut Value, patch: &Deferred<'_>) -> ModelResult<Option<String>> {
    let undefined = || ModelError::UndefinedProperty(patch.path.to_string());

    let segments = split_path(patch.path);
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(undefined());
    };

    let mut owner = occurrence;
    for segment in parents {
        owner = match owner.property_value(segment)? {
            Some(child) => child,
            None => return Err(undefined()),
        };
    }
    if !owner.has_property(leaf) {
        return Err(undefined());
    }

    match patch.node {
        None => {
            owner.take_property(leaf)?;
            Ok(parents.is_empty().then(|| leaf.clone()))
        }
        Some(node) => {
            let member = owner.member(leaf, node.clone())?;
            owner.insert_property(member)?;
            Ok(None)
        }
    }
}
