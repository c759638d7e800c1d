//! Crop production normalization.

use crate::error::{Result, SamarthError};
use crate::resource::RawRecord;

use super::{column_union, fold_record, numeric, pick, text, year, CropRow};

/// Column candidates per required field, in priority order. Price columns
/// stand in for production as a last resort, so a price-backed source
/// reports currency where every other source reports tonnes.
const REGION_COLUMNS: &[&str] = &["state", "subdivision"];
const CROP_COLUMNS: &[&str] = &["crop", "commodity"];
const YEAR_COLUMNS: &[&str] = &["year", "crop_year", "yr"];
const PRODUCTION_COLUMNS: &[&str] = &[
    "production",
    "production_tonnes",
    "prod_tonnes",
    "modal_price",
    "max_price",
];

/// Normalize raw crop production records.
///
/// Resolves each required output column through its priority list; the
/// district column is carried only when the source has one. A structurally
/// unresolvable column is fatal, while rows whose year or production fail
/// to coerce are dropped after the schema is resolved.
pub fn normalize_crop(records: &[RawRecord]) -> Result<Vec<CropRow>> {
    if records.is_empty() {
        return Err(SamarthError::Normalization(
            "Crop data returned no records. Check the dataset snapshot and its path.".to_string(),
        ));
    }

    let columns = column_union(records);

    let region_column = pick(&columns, REGION_COLUMNS);
    let crop_column = pick(&columns, CROP_COLUMNS);
    let year_column = pick(&columns, YEAR_COLUMNS);
    let production_column = pick(&columns, PRODUCTION_COLUMNS);
    let district_column = pick(&columns, &["district"]);

    let (region_column, crop_column, year_column, production_column) = match (
        region_column,
        crop_column,
        year_column,
        production_column,
    ) {
        (Some(region), Some(crop), Some(year), Some(production)) => {
            (region, crop, year, production)
        }
        (region, crop, year, production) => {
            let mut missing = Vec::new();
            if region.is_none() {
                missing.push("state");
            }
            if crop.is_none() {
                missing.push("crop");
            }
            if year.is_none() {
                missing.push("year");
            }
            if production.is_none() {
                missing.push("production");
            }
            return Err(SamarthError::Normalization(format!(
                "Missing columns in crop data: {:?}. Available columns: {:?}",
                missing, columns
            )));
        }
    };

    let mut rows = Vec::new();

    for record in records {
        let folded = fold_record(record);

        let Some(region) = folded.get(region_column).and_then(|v| text(v)) else {
            continue;
        };
        let Some(crop) = folded.get(crop_column).and_then(|v| text(v)) else {
            continue;
        };
        let Some(row_year) = folded.get(year_column).and_then(|v| year(v)) else {
            continue;
        };
        let Some(production) = folded
            .get(production_column)
            .and_then(|v| numeric(v))
            .filter(|p| *p >= 0.0)
        else {
            continue;
        };

        let district = district_column
            .and_then(|c| folded.get(c))
            .and_then(|v| text(v));

        rows.push(CropRow {
            region,
            district,
            crop,
            year: row_year,
            production,
        });
    }

    Ok(rows)
}
