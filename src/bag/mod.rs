//! Attribute bags and the read helpers built on them

pub mod attributes;
pub mod options;
pub mod query;
pub mod selector;

pub use attributes::{Bag, CallArgs};
pub use options::BagOptions;
pub use query::EntryKey;
pub use selector::{is_match, Selector};
