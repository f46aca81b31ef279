pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Key under which schedule-bearing outputs carry their period rows.
pub const SCHEDULE_KEY: &str = "amortization_schedule";

/// Schedule row columns in period order.
pub const SCHEDULE_COLUMNS: [&str; 7] = [
    "period",
    "date",
    "opening_balance",
    "payment",
    "interest",
    "principal",
    "closing_balance",
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

/// The schedule rows of an envelope, a financial resource, or a contract
/// resource with an embedded financial.
pub fn find_schedule(value: &Value) -> Option<&Vec<Value>> {
    let obj = value.as_object()?;
    if let Some(Value::Array(rows)) = obj.get(SCHEDULE_KEY) {
        return Some(rows);
    }
    ["result", "financial"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(find_schedule)
}
