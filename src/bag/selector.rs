//! Selectors for `pluck` and `filter`

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::path::{lookup, resolve, IntoPath, Path};
use crate::value::{Mapping, Value};

type Extractor = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// What to take from, or test on, each value
#[derive(Clone)]
pub enum Selector {
    /// The value at a path, or `Null`
    Property(Path),
    /// Whether the value at a path partially matches the expected value
    PathEquals(Path, Value),
    /// Whether the value partially matches every entry of the mapping
    PartialMatch(Mapping),
    /// Any extraction
    Function(Extractor),
}

impl Selector {
    pub fn property(path: impl IntoPath) -> Result<Self> {
        Ok(Selector::Property(path.into_path()?))
    }

    pub fn path_equals(path: impl IntoPath, expected: impl Into<Value>) -> Result<Self> {
        Ok(Selector::PathEquals(path.into_path()?, expected.into()))
    }

    pub fn matches<I, K, V>(expected: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Selector::PartialMatch(expected.into_iter().collect())
    }

    /// Wrap a predicate; its result becomes a `Bool`
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Selector::Function(Arc::new(move |value: &Value| Value::Bool(f(value))))
    }

    pub fn extract<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Selector::Function(Arc::new(f))
    }

    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Selector::Property(path) => lookup(value, path).cloned().unwrap_or_default(),
            Selector::PathEquals(path, expected) => {
                Value::Bool(lookup(value, path).is_some_and(|actual| is_match(actual, expected)))
            }
            Selector::PartialMatch(expected) => Value::Bool(matches_mapping(value, expected)),
            Selector::Function(f) => f(value),
        }
    }

    /// True if `apply` gives a truthy value
    pub fn test(&self, value: &Value) -> bool {
        self.apply(value).is_truthy()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Property(path) => f.debug_tuple("Property").field(&path.to_string()).finish(),
            Selector::PathEquals(path, expected) => f
                .debug_tuple("PathEquals")
                .field(&path.to_string())
                .field(expected)
                .finish(),
            Selector::PartialMatch(expected) => f.debug_tuple("PartialMatch").field(expected).finish(),
            Selector::Function(_) => f.write_str("Function"),
        }
    }
}

/// Partial deep match: every entry of `expected` must be found in `actual`.
///
/// Maps match key-wise, arrays match when each expected element matches
/// some actual element, and anything else by equality.
pub fn is_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (_, Value::Map(expected)) => matches_mapping(actual, expected),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|want| actual.iter().any(|have| is_match(have, want))),
        _ => actual == expected,
    }
}

/// Only maps and models can match a mapping.
fn matches_mapping(actual: &Value, expected: &Mapping) -> bool {
    if !matches!(actual, Value::Map(_) | Value::Model(_)) {
        return false;
    }
    expected.iter().all(|(key, want)| {
        resolve::child(actual, &key.as_str().into()).is_some_and(|have| is_match(have, want))
    })
}
