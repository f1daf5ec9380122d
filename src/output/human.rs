//! Human-readable output formatting

use crate::bag::Bag;
use crate::value::Value;

const INDENT: &str = "  ";

pub fn format_human(bag: &Bag) -> String {
    let title = if bag.is_guarded() {
        "Attributes (guarded)"
    } else {
        "Attributes"
    };
    let mut output = format!("{}\n{}\n", title, "-".repeat(title.len()));

    if bag.is_empty() {
        output.push_str("(empty)\n");
        return output;
    }

    write_children(&mut output, bag.attributes(), 0);
    output
}

fn write_children(output: &mut String, node: &Value, depth: usize) {
    match node {
        Value::Map(map) => {
            for (key, value) in map.iter() {
                write_entry(output, key, value, depth);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                write_entry(output, &format!("[{}]", index), value, depth);
            }
        }
        Value::Model(model) => write_children(output, &model.to_value(), depth),
        _ => {}
    }
}

fn write_entry(output: &mut String, label: &str, value: &Value, depth: usize) {
    let indent = INDENT.repeat(depth);
    match value {
        Value::Map(map) if map.is_empty() => output.push_str(&format!("{}{}: {{}}\n", indent, label)),
        Value::Array(items) if items.is_empty() => output.push_str(&format!("{}{}: []\n", indent, label)),
        Value::Map(_) | Value::Array(_) => {
            output.push_str(&format!("{}{}:\n", indent, label));
            write_children(output, value, depth + 1);
        }
        Value::Model(model) => {
            output.push_str(&format!("{}{}: <model>\n", indent, label));
            write_children(output, &model.to_value(), depth + 1);
        }
        scalar => output.push_str(&format!("{}{}: {}\n", indent, label, scalar)),
    }
}
