//! Path resolution against a value tree
//!
//! Reads walk maps, arrays and model attributes. Writes walk maps and
//! arrays only, creating missing containers on the way, and fail on the
//! first frozen mapping they would have to change.

use crate::error::{BagError, Result};
use crate::path::ast::{Path, Segment};
use crate::value::{Mapping, Value};

/// How far past the end of an array a write may land. Skipped slots are
/// filled with `Null`.
pub const MAX_INDEX_GAP: usize = 1024;

/// Resolve `path` below `root`. The root path resolves to `root` itself.
pub fn lookup<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

/// One step of a read.
pub(crate) fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match node {
        Value::Map(map) => map.get(&segment.key()),
        Value::Array(items) => segment.index().and_then(|index| items.get(index)),
        Value::Model(model) => model.attribute(&segment.key()),
        _ => None,
    }
}

/// Store `value` at `path`, creating intermediate containers.
///
/// A missing or scalar intermediate is replaced by an array when the next
/// segment is an index, by a map otherwise.
pub fn assign(root: &mut Value, path: &Path, value: Value) -> Result<()> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return Err(BagError::ParseError("Cannot assign to the root path".to_string()));
    };

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let next_is_index = segments[depth + 1].index().is_some();
        node = child_for_write(node, segment, next_is_index, path)?;
    }

    match node {
        Value::Map(map) => {
            entries_mut(map, path)?.insert(last.key().into_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            *array_slot(items, last, path)? = value;
            Ok(())
        }
        _ => Err(BagError::NotTraversable(path.to_string())),
    }
}

/// Remove the value at `path`. Absent paths are a no-op.
///
/// Array elements are removed, shifting later elements down. Paths that
/// reach into a model are a no-op too: model attributes are read-only.
pub fn remove(root: &mut Value, path: &Path) -> Result<Option<Value>> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(BagError::ParseError("Cannot remove the root path".to_string()));
    };
    if lookup(root, path).is_none() {
        return Ok(None);
    }

    let mut node = root;
    for segment in parents {
        node = match child_mut(node, segment, path)? {
            Some(child) => child,
            None => return Ok(None),
        };
    }

    match node {
        Value::Map(map) => Ok(entries_mut(map, path)?.shift_remove(last.key().as_ref())),
        Value::Array(items) => match last.index() {
            Some(index) if index < items.len() => Ok(Some(items.remove(index))),
            _ => Ok(None),
        },
        Value::Model(_) => Ok(None),
        _ => Err(BagError::NotTraversable(path.to_string())),
    }
}

fn entries_mut<'a>(map: &'a mut Mapping, path: &Path) -> Result<&'a mut crate::value::Entries> {
    map.entries_mut()
        .ok_or_else(|| BagError::ImmutabilityViolation(path.to_string()))
}

fn array_slot<'a>(items: &'a mut Vec<Value>, segment: &Segment, path: &Path) -> Result<&'a mut Value> {
    let index = segment
        .index()
        .ok_or_else(|| BagError::NotTraversable(path.to_string()))?;
    if index >= items.len() {
        let len = index
            .checked_add(1)
            .filter(|len| *len - items.len() <= MAX_INDEX_GAP)
            .ok_or_else(|| BagError::NotTraversable(path.to_string()))?;
        items.resize(len, Value::Null);
    }
    Ok(&mut items[index])
}

fn child_for_write<'a>(
    node: &'a mut Value,
    segment: &Segment,
    next_is_index: bool,
    path: &Path,
) -> Result<&'a mut Value> {
    let slot = match node {
        Value::Map(map) => entries_mut(map, path)?
            .entry(segment.key().into_owned())
            .or_insert(Value::Null),
        Value::Array(items) => array_slot(items, segment, path)?,
        _ => return Err(BagError::NotTraversable(path.to_string())),
    };

    match *slot {
        Value::Map(_) | Value::Array(_) => {}
        Value::Model(_) | Value::Function(_) => {
            return Err(BagError::NotTraversable(path.to_string()))
        }
        _ => {
            *slot = if next_is_index {
                Value::Array(Vec::new())
            } else {
                Value::Map(Mapping::new())
            };
        }
    }
    Ok(slot)
}

/// One step of a removal. `None` when the step enters a model.
fn child_mut<'a>(
    node: &'a mut Value,
    segment: &Segment,
    path: &Path,
) -> Result<Option<&'a mut Value>> {
    let found = match node {
        Value::Map(map) => entries_mut(map, path)?.get_mut(segment.key().as_ref()),
        Value::Array(items) => segment.index().and_then(|index| items.get_mut(index)),
        Value::Model(_) => return Ok(None),
        _ => None,
    };
    found
        .map(Some)
        .ok_or_else(|| BagError::NotTraversable(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freeze::freeze_value;
    use serde_json::json;

    fn tree(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn test_lookup_nested() {
        let root = tree(json!({"a": {"b": [10, {"c": "deep"}]}}));
        assert_eq!(lookup(&root, &path("a.b.0")), Some(&Value::from(10)));
        assert_eq!(lookup(&root, &path("a.b[1].c")), Some(&Value::from("deep")));
        assert_eq!(lookup(&root, &path("a.missing")), None);
        assert_eq!(lookup(&root, &path("a.b.5")), None);
        assert_eq!(lookup(&root, &path("a.b.x")), None);
        assert_eq!(lookup(&root, &Path::root()), Some(&root));
    }

    #[test]
    fn test_lookup_through_scalar_is_absent() {
        let root = tree(json!({"a": 1}));
        assert_eq!(lookup(&root, &path("a.b")), None);
    }

    #[test]
    fn test_lookup_index_on_map_uses_string_key() {
        let root = tree(json!({"m": {"0": "zero"}}));
        assert_eq!(lookup(&root, &path("m[0]")), Some(&Value::from("zero")));
    }

    #[test]
    fn test_assign_creates_maps() {
        let mut root = tree(json!({}));
        assign(&mut root, &path("a.b.c"), Value::from(1)).unwrap();
        assert_eq!(root.to_json(), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_assign_creates_arrays_for_index_segments() {
        let mut root = tree(json!({}));
        assign(&mut root, &path("list[2].name"), Value::from("x")).unwrap();
        assert_eq!(
            root.to_json(),
            json!({"list": [null, null, {"name": "x"}]})
        );

        assign(&mut root, &path("grid.0.1"), Value::from(true)).unwrap();
        assert_eq!(root.to_json()["grid"], json!([[null, true]]));
    }

    #[test]
    fn test_assign_replaces_scalar_intermediate() {
        let mut root = tree(json!({"a": 5}));
        assign(&mut root, &path("a.b"), Value::from(1)).unwrap();
        assert_eq!(root.to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_assign_overwrites_in_place() {
        let mut root = tree(json!({"x": 1, "y": 2}));
        assign(&mut root, &path("x"), Value::from(3)).unwrap();
        let keys: Vec<&String> = root.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_assign_into_frozen_fails() {
        let mut root = freeze_value(tree(json!({"a": {"b": 1}})));
        assert_eq!(
            assign(&mut root, &path("a.b"), Value::from(2)),
            Err(BagError::ImmutabilityViolation("a.b".to_string()))
        );
        assert_eq!(root.to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_assign_into_frozen_child_of_thawed_root() {
        let mut root = tree(json!({}));
        if let Value::Map(map) = &mut root {
            map.insert("locked", freeze_value(tree(json!({"k": 1})))).unwrap();
        }
        assert!(assign(&mut root, &path("open"), Value::from(1)).is_ok());
        assert!(matches!(
            assign(&mut root, &path("locked.k"), Value::from(2)),
            Err(BagError::ImmutabilityViolation(_))
        ));
    }

    #[test]
    fn test_assign_through_function_fails() {
        let mut root = tree(json!({}));
        assign(
            &mut root,
            &path("f"),
            Value::Function(crate::value::Function::new(|_, _| Ok(Value::Null))),
        )
        .unwrap();
        assert_eq!(
            assign(&mut root, &path("f.x"), Value::from(1)),
            Err(BagError::NotTraversable("f.x".to_string()))
        );
    }

    #[test]
    fn test_assign_named_key_on_array_fails() {
        let mut root = tree(json!({"list": [1]}));
        assert!(matches!(
            assign(&mut root, &path("list.name"), Value::from(1)),
            Err(BagError::NotTraversable(_))
        ));
    }

    #[test]
    fn test_assign_rejects_huge_index() {
        let mut root = tree(json!({}));
        assert_eq!(
            assign(&mut root, &path("list[18446744073709551615]"), Value::from(1)),
            Err(BagError::NotTraversable("list[18446744073709551615]".to_string()))
        );
        assert!(matches!(
            assign(&mut root, &path("list.10000000000"), Value::from(1)),
            Err(BagError::NotTraversable(_))
        ));
        assert!(matches!(
            assign(&mut root, &path("list[0][18446744073709551615]"), Value::from(1)),
            Err(BagError::NotTraversable(_))
        ));
    }

    #[test]
    fn test_assign_index_gap_limit() {
        let mut root = tree(json!({"list": [1]}));
        let within = format!("list[{}]", 1 + MAX_INDEX_GAP - 1);
        assign(&mut root, &path(&within), Value::from(2)).unwrap();
        assert_eq!(root.to_json()["list"].as_array().unwrap().len(), 1 + MAX_INDEX_GAP);

        let beyond = format!("list[{}]", 2 * MAX_INDEX_GAP + 1);
        assert!(matches!(
            assign(&mut root, &path(&beyond), Value::from(3)),
            Err(BagError::NotTraversable(_))
        ));
        assert_eq!(root.to_json()["list"].as_array().unwrap().len(), 1 + MAX_INDEX_GAP);
    }

    #[test]
    fn test_remove_through_model_is_noop() {
        #[derive(Debug)]
        struct Raw(Value);

        impl crate::value::Model for Raw {
            fn to_value(&self) -> Value {
                self.0.clone()
            }

            fn attribute(&self, key: &str) -> Option<&Value> {
                (key == "raw").then_some(&self.0)
            }
        }

        let mut root = tree(json!({}));
        let model: std::sync::Arc<dyn crate::value::Model> = std::sync::Arc::new(Raw(Value::from(5)));
        assign(&mut root, &path("x"), Value::Model(model)).unwrap();

        assert!(lookup(&root, &path("x.raw")).is_some());
        assert_eq!(remove(&mut root, &path("x.raw")).unwrap(), None);
        assert!(lookup(&root, &path("x.raw")).is_some());
    }

    #[test]
    fn test_assign_root_fails() {
        let mut root = tree(json!({}));
        assert!(assign(&mut root, &Path::root(), Value::from(1)).is_err());
    }

    #[test]
    fn test_remove_map_entry() {
        let mut root = tree(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(remove(&mut root, &path("a.b")).unwrap(), Some(Value::from(1)));
        assert_eq!(root.to_json(), json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut root = tree(json!({"a": {"b": 1}}));
        assert_eq!(remove(&mut root, &path("a.x.y")).unwrap(), None);
        assert_eq!(remove(&mut root, &path("zzz")).unwrap(), None);
        assert_eq!(root.to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_remove_array_element_shifts() {
        let mut root = tree(json!({"list": ["a", "b", "c"]}));
        assert_eq!(
            remove(&mut root, &path("list.1")).unwrap(),
            Some(Value::from("b"))
        );
        assert_eq!(root.to_json(), json!({"list": ["a", "c"]}));
    }

    #[test]
    fn test_remove_from_frozen_fails_only_when_present() {
        let mut root = freeze_value(tree(json!({"a": 1})));
        assert!(matches!(
            remove(&mut root, &path("a")),
            Err(BagError::ImmutabilityViolation(_))
        ));
        assert_eq!(remove(&mut root, &path("b")).unwrap(), None);
    }
}
