//! Insertion-ordered attribute maps that can be frozen in place.

use std::ops::Deref;
use std::sync::Arc;

use indexmap::map::{Iter, Keys, Values};
use indexmap::IndexMap;

use super::Value;
use crate::error::{BagError, Result};

/// Ordered entries of a mapping.
pub type Entries = IndexMap<String, Value>;

/// An owned, shared, immutable value.
///
/// `Frozen` derefs to its contents but has no `DerefMut`, so the only way
/// to change what it holds is to copy the contents out again. Clones share
/// the same allocation.
#[derive(Debug)]
pub struct Frozen<T>(Arc<T>);

impl<T> Frozen<T> {
    pub fn freeze(value: T) -> Self {
        Frozen(Arc::new(value))
    }

    /// True if both handles point at the same frozen allocation.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T: Clone> Frozen<T> {
    /// Take the contents back, copying only if the allocation is shared.
    pub fn into_inner(this: Self) -> T {
        Arc::try_unwrap(this.0).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T> Clone for Frozen<T> {
    fn clone(&self) -> Self {
        Frozen(Arc::clone(&self.0))
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

#[derive(Debug, Clone)]
enum Repr {
    Thawed(Entries),
    Frozen(Frozen<Entries>),
}

/// A plain-data mapping node of the attribute tree.
///
/// A mapping is either thawed (owned and writable) or frozen (shared and
/// read-only). Equality is structural and ignores which state a mapping
/// is in.
#[derive(Debug, Clone)]
pub struct Mapping(Repr);

impl Mapping {
    /// Create an empty, writable mapping
    pub fn new() -> Self {
        Mapping(Repr::Thawed(Entries::new()))
    }

    pub(crate) fn frozen(entries: Entries) -> Self {
        Mapping(Repr::Frozen(Frozen::freeze(entries)))
    }

    /// Split a thawed mapping into its entries; frozen mappings come back unchanged.
    pub(crate) fn into_thawed(self) -> std::result::Result<Entries, Self> {
        match self.0 {
            Repr::Thawed(entries) => Ok(entries),
            frozen => Err(Mapping(frozen)),
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.0, Repr::Frozen(_))
    }

    /// The frozen handle, if this mapping is frozen
    pub fn as_frozen(&self) -> Option<&Frozen<Entries>> {
        match &self.0 {
            Repr::Frozen(frozen) => Some(frozen),
            Repr::Thawed(_) => None,
        }
    }

    pub fn entries(&self) -> &Entries {
        match &self.0 {
            Repr::Thawed(entries) => entries,
            Repr::Frozen(frozen) => frozen,
        }
    }

    /// Writable entries, or `None` when the mapping is frozen.
    pub fn entries_mut(&mut self) -> Option<&mut Entries> {
        match &mut self.0 {
            Repr::Thawed(entries) => Some(entries),
            Repr::Frozen(_) => None,
        }
    }

    /// Consume the mapping, copying the entries out of a shared frozen allocation.
    pub fn into_entries(self) -> Entries {
        match self.0 {
            Repr::Thawed(entries) => entries,
            Repr::Frozen(frozen) => Frozen::into_inner(frozen),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries().get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Insert or replace an entry. Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        match self.entries_mut() {
            Some(entries) => Ok(entries.insert(key, value.into())),
            None => Err(BagError::ImmutabilityViolation(key)),
        }
    }

    /// Remove an entry, keeping the order of the remaining keys.
    ///
    /// Removing a key that is absent succeeds even when frozen.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        if !self.contains_key(key) {
            return Ok(None);
        }
        match self.entries_mut() {
            Some(entries) => Ok(entries.shift_remove(key)),
            None => Err(BagError::ImmutabilityViolation(key.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries().iter()
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.entries().keys()
    }

    pub fn values(&self) -> Values<'_, String, Value> {
        self.entries().values()
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl From<Entries> for Mapping {
    fn from(entries: Entries) -> Self {
        Mapping(Repr::Thawed(entries))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Mapping(Repr::Thawed(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_entries().into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
