//! Pest grammar parser for attribute paths

use pest::Parser;
use pest_derive::Parser;

use crate::error::{BagError, Result};
use crate::path::ast::{Path, Segment};

#[derive(Parser)]
#[grammar = "../grammar/path.pest"]
pub struct PathParser;

/// Parse a path string into a `Path`. The empty string is the root path.
pub fn parse_path(input: &str) -> Result<Path> {
    if input.is_empty() {
        return Ok(Path::root());
    }

    let pairs = PathParser::parse(Rule::path, input)
        .map_err(|e| BagError::ParseError(e.to_string()))?;

    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| BagError::ParseError("Empty input".to_string()))?;

    let mut segments = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::key | Rule::bare => segments.push(Segment::Key(inner.as_str().to_string())),
            Rule::dq_inner | Rule::sq_inner => segments.push(Segment::Key(unescape(inner.as_str()))),
            Rule::index => {
                let index = inner.as_str().parse().map_err(|e| {
                    BagError::ParseError(format!("Invalid index '{}': {}", inner.as_str(), e))
                })?;
                segments.push(Segment::Index(index));
            }
            Rule::EOI => {}
            other => {
                return Err(BagError::ParseError(format!(
                    "Unexpected rule in path: {:?}",
                    other
                )))
            }
        }
    }

    Ok(Path::new(segments))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
