//! Rainfall normalization: monthly source columns into annual totals.

use indexmap::IndexMap;

use crate::error::{Result, SamarthError};
use crate::resource::RawRecord;

use super::{column_union, fold_record, numeric, pick, text, year, RainfallRow};

/// Month abbreviations used to recognize monthly rainfall columns.
pub const MONTH_TOKENS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Column candidates for the region field, in priority order.
const REGION_COLUMNS: &[&str] = &["state", "subdivision"];

/// Column candidates for the year field, in priority order.
const YEAR_COLUMNS: &[&str] = &["year", "yr"];

/// Column candidates for an already-aggregated annual total, used when the
/// source carries no monthly columns.
const ANNUAL_COLUMNS: &[&str] = &["annual_mm", "annual", "annual_rainfall"];

/// Normalize raw rainfall records into one row per (region, year).
///
/// Monthly columns are identified by substring match against the twelve
/// month tokens and summed into an annual total; a source with no monthly
/// columns may instead carry a pre-aggregated annual column. Unparseable
/// month cells are excluded from the sum rather than counted as zero; a
/// row with no parseable month at all has no annual total and is dropped,
/// as are rows with an unresolvable year. Rows sharing a (region, year)
/// are combined by summing their totals.
pub fn normalize_rainfall(records: &[RawRecord]) -> Result<Vec<RainfallRow>> {
    let columns = column_union(records);

    let month_columns: Vec<&String> = columns
        .iter()
        .filter(|c| MONTH_TOKENS.iter().any(|m| c.contains(m)))
        .collect();
    let annual_column = pick(&columns, ANNUAL_COLUMNS);
    let has_total_source = !month_columns.is_empty() || annual_column.is_some();

    let (region_column, year_column) = match (
        pick(&columns, REGION_COLUMNS),
        pick(&columns, YEAR_COLUMNS),
    ) {
        (Some(region), Some(year)) if has_total_source => (region, year),
        (region, year) => {
            let mut missing = Vec::new();
            if region.is_none() {
                missing.push("state");
            }
            if year.is_none() {
                missing.push("year");
            }
            if !has_total_source {
                missing.push("monthly or annual rainfall");
            }
            return Err(SamarthError::Normalization(format!(
                "Missing columns in rainfall data: {:?}. Available columns: {:?}",
                missing, columns
            )));
        }
    };

    let mut totals: IndexMap<(String, i32), f64> = IndexMap::new();

    for record in records {
        let folded = fold_record(record);

        let Some(region) = folded.get(region_column).and_then(|v| text(v)) else {
            continue;
        };
        let Some(row_year) = folded.get(year_column).and_then(|v| year(v)) else {
            continue;
        };

        // None until the first parseable month; a sum of zero stays
        // distinguishable from "no data at all".
        let mut annual: Option<f64> = None;
        if month_columns.is_empty() {
            annual = annual_column
                .and_then(|c| folded.get(c))
                .and_then(|v| numeric(v))
                .filter(|v| *v >= 0.0);
        } else {
            for column in &month_columns {
                if let Some(value) = folded.get(column.as_str()).and_then(|v| numeric(v)) {
                    // Negative sentinels (e.g. -999) are missing, not rainfall.
                    if value >= 0.0 {
                        *annual.get_or_insert(0.0) += value;
                    }
                }
            }
        }
        let Some(annual) = annual else {
            continue;
        };

        *totals.entry((region, row_year)).or_insert(0.0) += annual;
    }

    Ok(totals
        .into_iter()
        .map(|((region, year), annual_total_mm)| RainfallRow {
            region,
            year,
            annual_total_mm,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_sums_month_columns() {
        let records = vec![record(&[
            ("STATE", json!("Gujarat")),
            ("YEAR", json!("2020")),
            ("JAN", json!("10.5")),
            ("FEB", json!("20.0")),
            ("MAR", json!("0.5")),
        ])];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Gujarat");
        assert_eq!(rows[0].year, 2020);
        assert!((rows[0].annual_total_mm - 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_unparseable_month_excluded_not_zeroed() {
        let records = vec![record(&[
            ("state", json!("Gujarat")),
            ("year", json!(2020)),
            ("jan", json!("NA")),
            ("feb", json!("15.0")),
        ])];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows[0].annual_total_mm, 15.0);
    }

    #[test]
    fn test_all_months_missing_drops_row() {
        let records = vec![
            record(&[
                ("state", json!("Gujarat")),
                ("year", json!(2020)),
                ("jan", json!("NA")),
            ]),
            record(&[
                ("state", json!("Kerala")),
                ("year", json!(2020)),
                ("jan", json!("5.0")),
            ]),
        ];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Kerala");
    }

    #[test]
    fn test_subdivision_fallback_for_region() {
        let records = vec![record(&[
            ("subdivision", json!("Saurashtra & Kutch")),
            ("yr", json!("1999")),
            ("jun", json!("120.0")),
        ])];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows[0].region, "Saurashtra & Kutch");
        assert_eq!(rows[0].year, 1999);
    }

    #[test]
    fn test_non_numeric_year_drops_row() {
        let records = vec![record(&[
            ("state", json!("Gujarat")),
            ("year", json!("unknown")),
            ("jan", json!("5.0")),
        ])];

        let rows = normalize_rainfall(&records).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_duplicate_region_year_combined() {
        let records = vec![
            record(&[
                ("state", json!("Gujarat")),
                ("year", json!(2020)),
                ("jan", json!("10.0")),
            ]),
            record(&[
                ("state", json!("Gujarat")),
                ("year", json!(2020)),
                ("feb", json!("5.0")),
            ]),
        ];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].annual_total_mm, 15.0);
    }

    #[test]
    fn test_missing_columns_is_normalization_error() {
        let records = vec![record(&[("city", json!("Rajkot")), ("jan", json!("4.0"))])];

        let err = normalize_rainfall(&records).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("state"));
        assert!(message.contains("year"));
        assert!(message.contains("Available columns"));
    }

    #[test]
    fn test_pre_aggregated_annual_column() {
        let records = vec![
            record(&[
                ("state", json!("Gujarat")),
                ("year", json!("2020")),
                ("annual_mm", json!("812.4")),
            ]),
            record(&[
                ("state", json!("Kerala")),
                ("year", json!("2020")),
                ("annual_mm", json!("NA")),
            ]),
        ];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].annual_total_mm, 812.4);
    }

    #[test]
    fn test_negative_sentinel_excluded() {
        let records = vec![record(&[
            ("state", json!("Gujarat")),
            ("year", json!(2020)),
            ("jan", json!(-999.0)),
            ("feb", json!(25.0)),
        ])];

        let rows = normalize_rainfall(&records).unwrap();
        assert_eq!(rows[0].annual_total_mm, 25.0);
    }
}
