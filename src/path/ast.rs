//! Parsed attribute paths

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{BagError, Result};

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Map key. A key made only of ASCII digits also addresses an array element.
    Key(String),
    /// Bracketed index, e.g. the `[0]` in `list[0]`
    Index(usize),
}

impl Segment {
    /// The map key this segment addresses
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(key) => Cow::Borrowed(key),
            Segment::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// The array index this segment addresses, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => {
                key.parse().ok()
            }
            Segment::Key(_) => None,
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// A sequence of segments from the root of the tree.
///
/// The empty path is the root and addresses the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse a path string like `a.b[0]["c.d"]`
    pub fn parse(input: &str) -> Result<Self> {
        super::grammar::parse_path(input)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// All but the last segment. `None` for the root path.
    pub fn parent(&self) -> Option<Path> {
        let (_, parents) = self.segments.split_last()?;
        Some(Path::new(parents.to_vec()))
    }

    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Path::new(segments)
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"', '\\'])
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Key(key) if needs_quoting(key) => {
                    f.write_str("[\"")?;
                    for c in key.chars() {
                        if c == '"' || c == '\\' {
                            f.write_str("\\")?;
                        }
                        write!(f, "{}", c)?;
                    }
                    f.write_str("\"]")?;
                }
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = BagError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

/// Anything a bag operation accepts as a path.
pub trait IntoPath {
    fn into_path(self) -> Result<Path>;
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path> {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path> {
        Path::parse(self)
    }
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_index() {
        assert_eq!(Segment::Index(3).index(), Some(3));
        assert_eq!(Segment::from("12").index(), Some(12));
        assert_eq!(Segment::from("+1").index(), None);
        assert_eq!(Segment::from("").index(), None);
        assert_eq!(Segment::from("a1").index(), None);
    }

    #[test]
    fn test_segment_key() {
        assert_eq!(Segment::Index(7).key(), "7");
        assert_eq!(Segment::from("name").key(), "name");
    }

    #[test]
    fn test_parent_and_child() {
        let path = Path::root().child("a").child(0usize).child("b");
        assert_eq!(path.len(), 3);
        assert_eq!(path.parent(), Some(Path::root().child("a").child(0usize)));
        assert_eq!(Path::root().child("a").parent(), Some(Path::root()));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn test_display_plain_and_indexed() {
        let path = Path::root().child("a").child(0usize).child("b");
        assert_eq!(path.to_string(), "a[0].b");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn test_display_quotes_awkward_keys() {
        let path = Path::new(vec!["a".into(), "x.y".into(), "".into(), "q\"".into()]);
        assert_eq!(path.to_string(), r#"a["x.y"][""]["q\""]"#);
    }
}
