//! Copy-on-write writes into a [`Value`] tree.
//!
//! Only the containers on the spine from the root to the written slot are
//! duplicated, and only when something else still holds them: every other
//! subtree of the result is the same allocation as in the input.
//!
//! Writing through a node that cannot hold the next segment materializes one:
//! - a missing, `null` or scalar node becomes `[]` for an index and `{}` for a key;
//! - an index past the end of an array pads the gap with `null`;
//! - an index into an object writes the decimal key (`"3"`);
//! - a key into an array turns the array into an object keyed by the former
//!   element indices, then adds the key.
//!
//! An index above [`statics::MAX_ARRAY_INDEX`] that would land in an array is
//! refused before anything is written.

use crate::error::SetError;
use crate::value::Map;
use crate::{JsonPath, Segment, Value, statics};
use std::sync::Arc;

/// A new tree equal to `doc` except that `path` now holds `value`.
/// The root path replaces the whole document.
pub fn set(doc: &Value, path: &JsonPath, value: Value) -> Result<Value, SetError> {
    let mut out = doc.clone();
    set_in_place(&mut out, path, value)?;
    Ok(out)
}

/// [`set`] for an owned root: containers nobody else references are
/// updated without copying. On error `root` is left as it was.
pub fn set_in_place(root: &mut Value, path: &JsonPath, value: Value) -> Result<(), SetError> {
    check_indices(root, path.segments())?;
    tracing::debug!(%path, "writing value");
    let node = std::mem::take(root);
    *root = assign(node, path.segments(), value);
    Ok(())
}

/// Follow `path` the way [`assign`] will and reject any index that would
/// pad an array (existing or materialized) past the limit.
fn check_indices(root: &Value, path: &[Segment]) -> Result<(), SetError> {
    let mut node = Some(root);
    for seg in path {
        node = match (node, seg) {
            (Some(Value::Object(map)), Segment::Key(k)) => map.get(k.as_str()),
            (Some(Value::Object(map)), Segment::Index(i)) => map.get(i.to_string().as_str()),
            (Some(Value::Array(items)), Segment::Key(k)) => promoted_member(items, k),
            (node, Segment::Index(i)) => {
                if *i > statics::MAX_ARRAY_INDEX {
                    tracing::warn!(index = *i, "refusing write past the array index limit");
                    return Err(SetError::IndexOutOfRange { index: *i });
                }
                node.and_then(Value::as_array).and_then(|items| items.get(*i))
            }
            (_, Segment::Key(_)) => None,
        };
    }
    Ok(())
}

/// The element a key reaches once its array has been promoted.
fn promoted_member<'a>(items: &'a [Value], key: &str) -> Option<&'a Value> {
    let i: usize = key.parse().ok()?;
    if i.to_string() != key {
        return None;
    }
    items.get(i)
}

fn assign(node: Value, path: &[Segment], value: Value) -> Value {
    let Some((seg, rest)) = path.split_first() else {
        return value;
    };

    match (node, seg) {
        (Value::Object(mut map), Segment::Key(k)) => {
            write_member(&mut map, k.clone(), rest, value);
            Value::Object(map)
        }
        (Value::Object(mut map), Segment::Index(i)) => {
            write_member(&mut map, i.to_string(), rest, value);
            Value::Object(map)
        }
        (Value::Array(mut items), Segment::Index(i)) => {
            write_element(&mut items, *i, rest, value);
            Value::Array(items)
        }
        (Value::Array(items), Segment::Key(k)) => {
            let mut map = Arc::new(promote(&items));
            write_member(&mut map, k.clone(), rest, value);
            Value::Object(map)
        }
        (_, Segment::Key(k)) => {
            let mut map = Arc::new(Map::new());
            write_member(&mut map, k.clone(), rest, value);
            Value::Object(map)
        }
        (_, Segment::Index(i)) => {
            let mut items = Arc::new(Vec::new());
            write_element(&mut items, *i, rest, value);
            Value::Array(items)
        }
    }
}

fn write_member(map: &mut Arc<Map>, key: String, rest: &[Segment], value: Value) {
    // An existing key keeps its position.
    let slot = Arc::make_mut(map).entry(key).or_default();
    let child = std::mem::take(slot);
    *slot = assign(child, rest, value);
}

/// `index` has passed [`check_indices`], so `index + 1` cannot overflow.
fn write_element(items: &mut Arc<Vec<Value>>, index: usize, rest: &[Segment], value: Value) {
    let items = Arc::make_mut(items);
    if index >= items.len() {
        tracing::debug!(index, len = items.len(), "extending array with nulls");
        items.resize(index + 1, Value::Null);
    }
    let slot = &mut items[index];
    let child = std::mem::take(slot);
    *slot = assign(child, rest, value);
}

fn promote(items: &[Value]) -> Map {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}
