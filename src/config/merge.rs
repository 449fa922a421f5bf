//! Generic deep merge over JSON values.
//!
//! An object already in place absorbs incoming objects key by key and ignores
//! anything else. Any other slot takes the incoming value: arrays concatenate
//! onto an existing array without duplicates, and scalars (including `null`)
//! replace what was there.

use serde_json::{Map, Value};

/// Merge every object in `sources`, left to right, into a new object.
///
/// Sources that are not objects are skipped.
pub fn deep_merge<'a, I>(sources: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut result = Map::new();
    for source in sources {
        if let Value::Object(map) = source {
            merge_into(&mut result, map);
        }
    }
    Value::Object(result)
}

fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        let merged = merge_value(target.remove(key), value);
        target.insert(key.clone(), merged);
    }
}

fn merge_value(existing: Option<Value>, incoming: &Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Object(mut map)), incoming) => {
            if let Value::Object(incoming) = incoming {
                merge_into(&mut map, incoming);
            }
            Value::Object(map)
        }
        (Some(Value::Array(mut items)), Value::Array(incoming)) => {
            extend_unique(&mut items, incoming);
            Value::Array(items)
        }
        (_, Value::Object(incoming)) => {
            let mut map = Map::new();
            merge_into(&mut map, incoming);
            Value::Object(map)
        }
        (_, other) => other.clone(),
    }
}

fn extend_unique(items: &mut Vec<Value>, incoming: &[Value]) {
    for item in incoming {
        if !items.contains(item) {
            items.push(item.clone());
        }
    }
}
