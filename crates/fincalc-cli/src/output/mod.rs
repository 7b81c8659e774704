pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Keys under which calculators return their per-period rows.
const SERIES_KEYS: [&str; 6] = ["schedule", "series", "steps", "years", "projection", "scenarios"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// What a command handed back, as the tabular printers see it.
pub(crate) enum Shape<'a> {
    /// A calculator envelope: summary fields plus an optional row set.
    Envelope {
        result: &'a Map<String, Value>,
        rows: Option<(&'a str, &'a [Value])>,
        warnings: Vec<&'a str>,
        methodology: Option<&'a str>,
    },
    /// Reference data such as the rate tables or resolved content.
    Fields(&'a Map<String, Value>),
    /// Chart rows.
    Rows(&'a [Value]),
}

impl<'a> Shape<'a> {
    pub(crate) fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(rows) => Some(Shape::Rows(rows)),
            Value::Object(map) => match map.get("result") {
                Some(Value::Object(result)) => Some(Shape::Envelope {
                    result,
                    rows: series_of(result),
                    warnings: map
                        .get("warnings")
                        .and_then(Value::as_array)
                        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
                        .unwrap_or_default(),
                    methodology: map.get("methodology").and_then(Value::as_str),
                }),
                _ => Some(Shape::Fields(map)),
            },
            _ => None,
        }
    }
}

/// The first per-period row array in a result object, with its key.
fn series_of(result: &Map<String, Value>) -> Option<(&str, &[Value])> {
    SERIES_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_object) => {
            Some((*key, rows.as_slice()))
        }
        _ => None,
    })
}

/// Column order for a row set: keys in first-seen order across all rows.
///
/// Chart rows omit fields a point lacks, so the first row alone is not enough.
pub(crate) fn columns(rows: &[Value]) -> Vec<&str> {
    let mut cols: Vec<&str> = Vec::new();
    for key in rows.iter().filter_map(Value::as_object).flat_map(|r| r.keys()) {
        if !cols.contains(&key.as_str()) {
            cols.push(key.as_str());
        }
    }
    cols
}

/// One cell of text. Decimals arrive as JSON strings and pass through untouched.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Cells of `row` in `cols` order; missing keys become blanks.
pub(crate) fn row_cells(row: &Value, cols: &[&str]) -> Vec<String> {
    cols.iter()
        .map(|c| row.get(*c).map(cell).unwrap_or_default())
        .collect()
}
