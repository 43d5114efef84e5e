use crate::{JsonPath, Segment, Value};

/// The value at `path`, or `None` when any step misses.
///
/// A step misses when the current node is a scalar or `null`, when an index
/// is out of range, or when a key is not a member. A member that holds
/// `null` is found (`Some(&Value::Null)`). An index into an object looks up
/// the decimal key, the way a JS property access does.
pub fn get<'a>(doc: &'a Value, path: &JsonPath) -> Option<&'a Value> {
    path.iter().try_fold(doc, step)
}

fn step<'a>(node: &'a Value, seg: &Segment) -> Option<&'a Value> {
    match (node, seg) {
        (Value::Object(map), Segment::Key(k)) => map.get(k.as_str()),
        (Value::Object(map), Segment::Index(i)) => map.get(i.to_string().as_str()),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    }
}
