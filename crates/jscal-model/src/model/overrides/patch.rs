//! Patch generation: diffing an occurrence back into a patch object.

use jscal_core::constants::PATH_SEPARATOR;
use serde_json::Map as Members;

use crate::error::ModelResult;
use crate::model::core::{Node, Property, Value, Variant};
use crate::model::registry::{self, types};

/// Escapes one path segment: `~` as `~0`, `/` as `~1`.
pub(crate) fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Splits a patch path into unescaped segments.
pub(crate) fn split_path(path: &str) -> Vec<String> {
    path.split(PATH_SEPARATOR)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// ## Summary
/// Regenerates the patch object of a bound override from its occurrence.
///
/// Every changed member is emitted at its path, unless it was synthesized by
/// the engine. Members with changes only below them are descended into, so an
/// edit to a nested field produces a patch for that field alone. Top-level
/// members deleted since binding follow as `null` patches. Unbound overrides
/// are left untouched.
///
/// ## Errors
/// Returns `NotAnObject` if the occurrence is not object-shaped.
pub(crate) fn write_patches(occurrence: &mut Value) -> ModelResult<()> {
    let Variant::Override(state) = &occurrence.variant else {
        return Ok(());
    };
    if !state.is_bound() {
        return Ok(());
    }

    let mut patches = Members::new();
    for prop in occurrence.properties()? {
        if registry::is_immutable(prop.name()) || !prop.has_changes() {
            continue;
        }
        collect_patches(&escape_segment(prop.name()), prop, &mut patches);
    }

    for name in &state.deleted {
        let path = escape_segment(name);
        if !occurrence.has_property(name) && !patches.contains_key(&path) {
            patches.insert(path, Node::Null);
        }
    }

    tracing::debug!(
        recurrence_id = state.recurrence_id().unwrap_or_default(),
        patches = patches.len(),
        "Generated override patches"
    );

    if let Variant::Override(state) = &mut occurrence.variant {
        state.delta = Some(Value::new(types::PATCH_OBJECT, Node::Object(patches)));
    }

    Ok(())
}

/// Collects the patches for one member, depth first in member order.
fn collect_patches(path: &str, prop: &Property, patches: &mut Members<String, Node>) {
    let Some(value) = prop.resolved() else {
        return;
    };
    if value.override_generated() {
        return;
    }

    if value.changed() {
        patches.insert(path.to_string(), value.to_node());
        return;
    }

    if let Ok(children) = value.properties() {
        for child in children.iter().filter(|child| child.has_changes()) {
            let child_path = format!("{path}{PATH_SEPARATOR}{}", escape_segment(child.name()));
            collect_patches(&child_path, child, patches);
        }
    }
}
