//! Read-only collection helpers over a bag's attributes

use std::fmt;

use super::attributes::Bag;
use super::selector::Selector;
use crate::path::{IntoPath, Path};
use crate::value::Value;

/// Position of an entry handed to `map` and `each` iteratees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'a> {
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for EntryKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Name(name) => write!(f, "{}", name),
            EntryKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Visit the direct children of `node`. Models are visited through their
/// `to_value` view; scalars and functions have no children.
fn for_each_entry(node: &Value, f: &mut dyn FnMut(&Value, EntryKey<'_>)) {
    match node {
        Value::Map(map) => {
            for (key, value) in map.iter() {
                f(value, EntryKey::Name(key));
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                f(value, EntryKey::Index(index));
            }
        }
        Value::Model(model) => {
            let view = model.to_value();
            if !matches!(view, Value::Model(_)) {
                for_each_entry(&view, f);
            }
        }
        _ => {}
    }
}

impl Bag {
    /// Map every top-level attribute
    pub fn map<R, F>(&self, iteratee: F) -> Vec<R>
    where
        F: FnMut(&Value, EntryKey<'_>) -> R,
    {
        self.map_at(Path::root(), iteratee)
    }

    /// Map the children of the value at `key`. Absent or scalar targets yield nothing.
    pub fn map_at<R, F>(&self, key: impl IntoPath, mut iteratee: F) -> Vec<R>
    where
        F: FnMut(&Value, EntryKey<'_>) -> R,
    {
        let mut results = Vec::new();
        self.each_at(key, |value, entry| results.push(iteratee(value, entry)));
        results
    }

    pub fn each<F>(&self, iteratee: F) -> &Self
    where
        F: FnMut(&Value, EntryKey<'_>),
    {
        self.each_at(Path::root(), iteratee)
    }

    /// Visit the children of the value at `key` in order
    pub fn each_at<F>(&self, key: impl IntoPath, mut iteratee: F) -> &Self
    where
        F: FnMut(&Value, EntryKey<'_>),
    {
        if let Some(node) = self.get(key) {
            for_each_entry(node, &mut iteratee);
        }
        self
    }

    /// Top-level values in insertion order
    pub fn values(&self) -> Vec<&Value> {
        self.tree().map(|map| map.values().collect()).unwrap_or_default()
    }

    /// Top-level keys in insertion order
    pub fn keys(&self) -> Vec<&str> {
        self.tree()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Apply `selector` to every top-level value
    pub fn pluck(&self, selector: &Selector) -> Vec<Value> {
        self.values().into_iter().map(|value| selector.apply(value)).collect()
    }

    /// Top-level values the selector accepts
    pub fn filter(&self, selector: &Selector) -> Vec<&Value> {
        self.values()
            .into_iter()
            .filter(|value| selector.test(value))
            .collect()
    }
}
