//! Model instances and callable values stored in the attribute tree.

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::error::Result;

/// An instance stored in the tree in place of the raw value it was built from.
///
/// Models are opaque to freezing: a guarded bag freezes the maps that hold
/// a model, never the model itself.
pub trait Model: fmt::Debug + Send + Sync {
    /// Plain-data view of the instance, used for output and comparison.
    fn to_value(&self) -> Value;

    /// Field lookup used when a path passes through the instance.
    fn attribute(&self, _key: &str) -> Option<&Value> {
        None
    }
}

/// A model that can be built from the single raw value written into a bag.
pub trait AttributeModel: Model + Sized + 'static {
    fn from_value(value: Value) -> Self;
}

/// Builds the stored model for a raw value.
pub type ModelFactory = Arc<dyn Fn(Value) -> Arc<dyn Model> + Send + Sync>;

/// Factory that calls `M::from_value`.
pub fn factory_for<M: AttributeModel>() -> ModelFactory {
    Arc::new(|value| Arc::new(M::from_value(value)) as Arc<dyn Model>)
}

type Callable = dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync;

/// A function value. Called with a receiver (the value holding it) and arguments.
#[derive(Clone)]
pub struct Function(Arc<Callable>);

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(f))
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        (self.0)(receiver, args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}
