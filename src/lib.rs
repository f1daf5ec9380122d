//! Dotbag - dot-path addressable attributes with a guarded mode
//!
//! A `Bag` stores nested attributes addressed by paths such as `a.b.c` or
//! `list[0].name`. Guarding a bag deep-freezes its plain mappings so that
//! ordinary writes fail until it is unguarded; `mutate` writes through the
//! guard and restores it.
//!
//! # Example
//!
//! ```
//! use dotbag::{Bag, BagError, BagOptions, Value};
//! use serde_json::json;
//!
//! let mut bag = Bag::from_json(json!({"a": {"b": 1}}), BagOptions::default()).unwrap();
//! bag.set("a.c", 2).unwrap();
//! bag.guard();
//!
//! assert!(matches!(bag.set("a.b", 99), Err(BagError::ImmutabilityViolation(_))));
//! bag.mutate("a.b", 99).unwrap();
//! assert_eq!(bag.get("a.b"), Some(&Value::from(99)));
//! assert!(bag.is_guarded());
//! ```

pub mod bag;
pub mod error;
pub mod freeze;
pub mod output;
pub mod path;
pub mod value;

pub use bag::{Bag, BagOptions, CallArgs, EntryKey, Selector};
pub use error::{BagError, Result};
pub use freeze::{freeze, is_deeply_frozen, unfreeze};
pub use output::{format_bag, OutputFormat};
pub use path::{parse_path, IntoPath, Path, Segment};
pub use value::{AttributeModel, Function, Mapping, Model, Value};
