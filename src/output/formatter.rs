//! Output formatting

use crate::bag::Bag;
use crate::output::human::format_human;
use crate::output::json::format_json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

pub fn format_bag(bag: &Bag, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(bag),
        OutputFormat::Json => format_json(bag),
    }
}
