//! Deep freeze and unfreeze of the plain-mapping skeleton of a tree.
//!
//! Only `Value::Map` nodes are visited. Arrays, models and functions are
//! opaque leaves: they are never traversed, frozen, or taken apart, so a
//! map stored inside an array stays writable once the array is copied out.

use crate::value::{Mapping, Value};

/// Freeze `node` and every mapping reachable from it through mappings.
///
/// Children are frozen before their parent. Freezing a frozen mapping
/// returns it unchanged, sharing the same allocation.
pub fn freeze(node: Mapping) -> Mapping {
    match node.into_thawed() {
        Ok(entries) => Mapping::frozen(
            entries
                .into_iter()
                .map(|(key, value)| (key, freeze_value(value)))
                .collect(),
        ),
        Err(frozen) => frozen,
    }
}

/// Produce a new writable copy of `node`.
///
/// Every nested mapping is unfrozen into a fresh mapping. All other
/// values are cloned as-is; models and functions stay shared.
pub fn unfreeze(node: &Mapping) -> Mapping {
    node.iter()
        .map(|(key, value)| (key.clone(), unfreeze_value(value)))
        .collect()
}

pub fn freeze_value(value: Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(freeze(map)),
        other => other,
    }
}

pub fn unfreeze_value(value: &Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(unfreeze(map)),
        other => other.clone(),
    }
}

/// True if `node` and every mapping nested in it through mappings is frozen.
pub fn is_deeply_frozen(node: &Mapping) -> bool {
    node.is_frozen()
        && node.values().all(|value| match value {
            Value::Map(child) => is_deeply_frozen(child),
            _ => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Frozen;
    use serde_json::json;

    fn mapping(json: serde_json::Value) -> Mapping {
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("expected map, got {}", other.kind()),
        }
    }

    #[test]
    fn test_freeze_is_deep() {
        let frozen = freeze(mapping(json!({"a": {"b": {"c": 1}}, "d": 2})));
        assert!(is_deeply_frozen(&frozen));
        let a = frozen.get("a").and_then(Value::as_map).unwrap();
        assert!(a.is_frozen());
        assert!(a.get("b").and_then(Value::as_map).unwrap().is_frozen());
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let once = freeze(mapping(json!({"a": {"b": 1}})));
        let twice = freeze(once.clone());
        assert_eq!(once, twice);
        assert!(Frozen::ptr_eq(
            once.as_frozen().unwrap(),
            twice.as_frozen().unwrap()
        ));
    }

    #[test]
    fn test_arrays_are_opaque() {
        let frozen = freeze(mapping(json!({"list": [{"x": 1}]})));
        let list = frozen.get("list").and_then(Value::as_array).unwrap();
        let inner = list[0].as_map().unwrap();
        assert!(!inner.is_frozen());
        // Still deeply frozen: arrays are never traversed
        assert!(is_deeply_frozen(&frozen));
    }

    #[test]
    fn test_unfreeze_is_writable_and_equal() {
        let source = mapping(json!({"a": {"b": {"c": 1}}, "d": [1, 2]}));
        let frozen = freeze(source.clone());
        let mut thawed = unfreeze(&frozen);

        assert_eq!(thawed, source);
        assert!(!thawed.is_frozen());

        thawed.insert("e", 5).unwrap();
        if let Some(Value::Map(a)) = thawed.entries_mut().and_then(|e| e.get_mut("a")) {
            a.insert("z", true).unwrap();
            if let Some(Value::Map(b)) = a.entries_mut().and_then(|e| e.get_mut("b")) {
                b.insert("c", 99).unwrap();
            }
        }

        assert_eq!(
            Value::Map(thawed).to_json(),
            json!({"a": {"b": {"c": 99}, "z": true}, "d": [1, 2], "e": 5})
        );
        // The frozen original is untouched
        assert_eq!(Value::Map(frozen).to_json()["a"]["b"]["c"], json!(1));
    }

    #[test]
    fn test_unfreeze_thawed_copies() {
        let source = mapping(json!({"a": {"b": 1}}));
        let mut copy = unfreeze(&source);
        copy.insert("c", 2).unwrap();
        assert!(!source.contains_key("c"));
    }

    #[test]
    fn test_value_helpers_pass_through_non_maps() {
        assert_eq!(freeze_value(Value::from(3)), Value::from(3));
        assert_eq!(unfreeze_value(&Value::from("x")), Value::from("x"));
        let frozen = freeze_value(Value::from(json!({"a": 1})));
        assert!(frozen.as_map().unwrap().is_frozen());
        assert!(!unfreeze_value(&frozen).as_map().unwrap().is_frozen());
    }
}
