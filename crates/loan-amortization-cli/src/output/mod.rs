pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Number, Value};

/// Column order for schedule rows; serde_json maps are key-sorted.
pub const SCHEDULE_COLUMNS: [&str; 5] = [
    "index",
    "payment",
    "interest_portion",
    "principal_portion",
    "remaining_balance",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Fields shown at full precision rather than to the cent.
const FULL_PRECISION_FIELDS: [&str; 1] = ["unrounded_payment"];

/// Number formatting for a named field.
pub(crate) fn format_field_number(key: &str, n: &Number) -> String {
    if FULL_PRECISION_FIELDS.contains(&key) {
        n.to_string()
    } else {
        format_number(n)
    }
}

/// Integers as-is, amounts to the cent.
pub(crate) fn format_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64()
            .map(|f| format!("{:.2}", f))
            .unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

/// Header row for an array of objects: the schedule order when every
/// schedule column is present, otherwise the keys of the first object.
pub(crate) fn column_headers(first: &serde_json::Map<String, Value>) -> Vec<String> {
    if SCHEDULE_COLUMNS.iter().all(|c| first.contains_key(*c)) {
        SCHEDULE_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        first.keys().cloned().collect()
    }
}
