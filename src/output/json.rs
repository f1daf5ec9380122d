//! JSON output formatting

use serde::Serialize;

use crate::bag::Bag;
use crate::value::Value;

#[derive(Serialize)]
struct Envelope<'a> {
    guarded: bool,
    attributes: &'a Value,
}

pub fn format_json(bag: &Bag) -> String {
    let envelope = Envelope {
        guarded: bag.is_guarded(),
        attributes: bag.attributes(),
    };
    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string())
}
