//! Bag construction options

use std::fmt;
use std::sync::Arc;

use crate::value::{factory_for, AttributeModel, Model, ModelFactory, Value};

/// Options applied when a bag is created
#[derive(Clone, Default)]
pub struct BagOptions {
    /// Guard the attributes right after the initial reset
    pub guarded: bool,
    /// Wraps every value written through `set`, `reset` and `mutate`
    pub model: Option<ModelFactory>,
}

impl BagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    /// Wrap written values with `M::from_value`
    pub fn model<M: AttributeModel>(mut self) -> Self {
        self.model = Some(factory_for::<M>());
        self
    }

    pub fn model_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Value) -> Arc<dyn Model> + Send + Sync + 'static,
    {
        self.model = Some(Arc::new(factory));
        self
    }
}

impl fmt::Debug for BagOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BagOptions")
            .field("guarded", &self.guarded)
            .field("model", &self.model.is_some())
            .finish()
    }
}
