//! Path syntax for addressing nested attributes
//!
//! Paths are dotted (`a.b.c`) with optional brackets for indexes and
//! awkward keys (`list[0]`, `a["x.y"]`).

pub mod ast;
pub mod grammar;
pub mod resolve;

pub use ast::{IntoPath, Path, Segment};
pub use grammar::parse_path;
pub use resolve::{assign, lookup, remove};
