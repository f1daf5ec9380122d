//! The attribute bag
//!
//! A `Bag` owns a tree of attributes addressed by dotted paths. Guarding a
//! bag deep-freezes the tree; every ordinary write then fails until the
//! bag is unguarded, and `mutate` is the one write that goes through
//! regardless.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use super::options::BagOptions;
use crate::error::{BagError, Result};
use crate::freeze::{freeze_value, unfreeze_value};
use crate::path::{assign, lookup, remove, IntoPath, Path};
use crate::value::{Entries, Mapping, ModelFactory, Value};

/// Placeholder used in errors for writes that target the whole tree
const ROOT: &str = "<attributes>";

/// Arguments passed to a function value by `call` and `invoke`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(pub Vec<Value>);

impl From<Vec<Value>> for CallArgs {
    fn from(args: Vec<Value>) -> Self {
        CallArgs(args)
    }
}

/// An array is spread into the argument list; any other value becomes the only argument.
impl From<Value> for CallArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => CallArgs(items),
            other => CallArgs(vec![other]),
        }
    }
}

impl From<()> for CallArgs {
    fn from(_: ()) -> Self {
        CallArgs(Vec::new())
    }
}

/// Path-addressable attributes with a guarded mode
#[derive(Clone)]
pub struct Bag {
    /// Attribute tree; always a `Value::Map`
    attributes: Value,
    guarded: bool,
    model: Option<ModelFactory>,
    /// Fields grafted onto the bag itself by `include`
    fields: IndexMap<String, Value>,
}

impl Bag {
    /// Create a bag and load `attributes` into it as `reset` does.
    pub fn new<I, K, V>(attributes: I, options: BagOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut bag = Self {
            model: options.model,
            ..Self::new_default()
        };
        bag.reset(attributes, options.guarded)?;
        Ok(bag)
    }

    /// Create an empty, unguarded bag without a model
    pub fn new_default() -> Self {
        Self {
            attributes: Value::Map(Mapping::new()),
            guarded: false,
            model: None,
            fields: IndexMap::new(),
        }
    }

    /// Create a bag from a JSON object
    pub fn from_json(json: serde_json::Value, options: BagOptions) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Self::new(map, options),
            other => Err(BagError::NotAMapping(Value::from(other).kind().to_string())),
        }
    }

    /// Replace all attributes with `attributes`, then guard if asked.
    ///
    /// Keys are parsed as paths and values are wrapped by the model, as
    /// with `set`. The new tree is built aside and swapped in at the end,
    /// so a failing entry leaves the bag as it was.
    pub fn reset<I, K, V>(&mut self, attributes: I, guarded: bool) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.ensure_writable(ROOT)?;

        let mut tree = Value::Map(Mapping::new());
        for (key, value) in attributes {
            let key: String = key.into();
            let path = key.into_path()?;
            assign(&mut tree, &path, self.convert_to_model(value.into()))?;
        }
        self.attributes = tree;

        debug!(keys = self.len(), guarded, "Reset attributes");

        if guarded {
            self.guard();
        }
        Ok(self)
    }

    /// Deep-freeze the attributes and mark the bag guarded
    pub fn guard(&mut self) -> &mut Self {
        let tree = std::mem::take(&mut self.attributes);
        self.attributes = freeze_value(tree);
        self.guarded = true;
        debug!(keys = self.len(), "Guarded attributes");
        self
    }

    /// Replace the attributes with a writable copy and mark the bag unguarded
    pub fn unguard(&mut self) -> &mut Self {
        self.attributes = unfreeze_value(&self.attributes);
        self.guarded = false;
        debug!(keys = self.len(), "Unguarded attributes");
        self
    }

    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    /// Write `value` at `key` even while guarded.
    ///
    /// A guarded bag is unguarded for the write and guarded again afterwards,
    /// also when the write fails.
    pub fn mutate(&mut self, key: impl IntoPath, value: impl Into<Value>) -> Result<&mut Self> {
        let path = key.into_path()?;
        if !self.guarded {
            self.write(&path, value.into())?;
            return Ok(self);
        }

        trace!(path = %path, "Mutating guarded attributes");
        self.unguard();
        let written = self.write(&path, value.into());
        self.guard();
        written?;
        Ok(self)
    }

    /// Value at `key`. The empty path is the whole tree; absent or
    /// unparsable paths give `None`.
    pub fn get(&self, key: impl IntoPath) -> Option<&Value> {
        let path = key.into_path().ok()?;
        lookup(&self.attributes, &path)
    }

    /// Value at `key`, or `fallback` when absent
    pub fn get_or(&self, key: impl IntoPath, fallback: impl Into<Value>) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => fallback.into(),
        }
    }

    pub fn get_or_null(&self, key: impl IntoPath) -> Value {
        self.get_or(key, Value::Null)
    }

    /// Store the model-converted `value` at `key`, creating intermediate containers.
    pub fn set(&mut self, key: impl IntoPath, value: impl Into<Value>) -> Result<&mut Self> {
        let path = key.into_path()?;
        self.write(&path, value.into())?;
        Ok(self)
    }

    /// True if the full path resolves, even to `Null`
    pub fn has(&self, key: impl IntoPath) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entry at `key` if present.
    ///
    /// Paths that reach into a model are a no-op, even though `has` sees
    /// them: model attributes are read-only.
    pub fn forget(&mut self, key: impl IntoPath) -> Result<&mut Self> {
        let path = key.into_path()?;
        self.ensure_writable(&path.to_string())?;
        if !path.is_root() {
            remove(&mut self.attributes, &path)?;
        }
        Ok(self)
    }

    /// Shallow copy of the top-level entries
    pub fn all(&self) -> IndexMap<String, Value> {
        self.tree().map(|map| map.entries().clone()).unwrap_or_default()
    }

    /// Merge entries into the top level as-is.
    ///
    /// Unlike `set`, keys are not parsed as paths and values are not
    /// converted to models.
    pub fn put<I, K, V>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.ensure_writable(ROOT)?;
        let entries = self.entries_mut()?;
        for (key, value) in attributes {
            entries.insert(key.into(), value.into());
        }
        Ok(self)
    }

    /// Graft fields onto the bag itself, outside the attribute tree.
    ///
    /// Fields are never guarded.
    pub fn include<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in fields {
            self.fields.insert(key.into(), value.into());
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Call the function stored at `key` with its parent as receiver
    pub fn call(&self, key: impl IntoPath, args: impl Into<CallArgs>) -> Result<Value> {
        let path = key.into_path()?;
        let Some(Value::Function(function)) = lookup(&self.attributes, &path) else {
            return Err(BagError::NotInvocable(path.to_string()));
        };
        let receiver = path
            .parent()
            .and_then(|parent| lookup(&self.attributes, &parent))
            .unwrap_or(&Value::Null);
        let args: CallArgs = args.into();
        function.call(receiver, &args.0)
    }

    /// Call an included function field with the attribute tree as receiver
    pub fn invoke(&self, name: &str, args: impl Into<CallArgs>) -> Result<Value> {
        let args: CallArgs = args.into();
        match self.fields.get(name) {
            Some(Value::Function(function)) => function.call(&self.attributes, &args.0),
            _ => Err(BagError::NotInvocable(name.to_string())),
        }
    }

    /// Insert top-level defaults for keys that are absent. Existing values win.
    pub fn defaults<I, K, V>(&mut self, defaults: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.ensure_writable(ROOT)?;
        let entries = self.entries_mut()?;
        for (key, value) in defaults {
            entries.entry(key.into()).or_insert_with(|| value.into());
        }
        Ok(self)
    }

    /// Wrap `value` with the configured model, if any
    pub fn convert_to_model(&self, value: Value) -> Value {
        match &self.model {
            Some(factory) => Value::Model(factory(value)),
            None => value,
        }
    }

    /// A copy of the attribute tree. Cheap while guarded: the frozen
    /// mapping is shared, not copied.
    pub fn snapshot(&self) -> Mapping {
        self.tree().cloned().unwrap_or_default()
    }

    /// The attribute tree as a value
    pub fn attributes(&self) -> &Value {
        &self.attributes
    }

    /// Number of top-level attributes
    pub fn len(&self) -> usize {
        self.tree().map_or(0, Mapping::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn tree(&self) -> Option<&Mapping> {
        self.attributes.as_map()
    }

    fn entries_mut(&mut self) -> Result<&mut Entries> {
        match &mut self.attributes {
            Value::Map(map) => map
                .entries_mut()
                .ok_or_else(|| BagError::ImmutabilityViolation(ROOT.to_string())),
            other => Err(BagError::NotAMapping(other.kind().to_string())),
        }
    }

    fn ensure_writable(&self, path: &str) -> Result<()> {
        if self.guarded {
            return Err(BagError::ImmutabilityViolation(path.to_string()));
        }
        Ok(())
    }

    fn write(&mut self, path: &Path, value: Value) -> Result<()> {
        self.ensure_writable(&path.to_string())?;
        let value = self.convert_to_model(value);
        assign(&mut self.attributes, path, value)
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new_default()
    }
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bag")
            .field("attributes", &self.attributes)
            .field("guarded", &self.guarded)
            .field("model", &self.model.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

impl Serialize for Bag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
