//! Schema normalization: source-specific shapes into the two canonical rows.

mod crop;
mod rainfall;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::RawRecord;

pub use crop::normalize_crop;
pub use rainfall::{normalize_rainfall, MONTH_TOKENS};

/// One region-year of rainfall after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallRow {
    pub region: String,
    pub year: i32,
    pub annual_total_mm: f64,
}

/// One region-crop-year of production after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRow {
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub crop: String,
    pub year: i32,
    pub production: f64,
}

/// Values that stand in for "missing" in source data.
fn is_null_text(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// A record with case-folded column names. First occurrence wins when
/// folding collapses two source columns onto one name.
pub(crate) fn fold_record(record: &RawRecord) -> IndexMap<String, &Value> {
    let mut folded = IndexMap::new();
    for (key, value) in record {
        folded.entry(key.to_lowercase()).or_insert(value);
    }
    folded
}

/// Union of case-folded column names across all records, first-seen order.
pub(crate) fn column_union(records: &[RawRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            let folded = key.to_lowercase();
            if !columns.contains(&folded) {
                columns.push(folded);
            }
        }
    }
    columns
}

/// First candidate present in the column list.
pub(crate) fn pick<'a>(columns: &[String], candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| columns.iter().any(|c| c == candidate))
}

/// Coerce a scalar to a float. Unparseable or null-ish values are missing,
/// never zero.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !is_null_text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a scalar to a trimmed non-empty string.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !is_null_text(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a scalar to an integer year.
pub(crate) fn year(value: &Value) -> Option<i32> {
    numeric(value).map(|y| y as i32)
}
