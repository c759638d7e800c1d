//! Analytical query engine: windowed aggregates over the normalized tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SamarthError};
use crate::normalize::{normalize_crop, normalize_rainfall, CropRow, RainfallRow};
use crate::question::StructuredQuery;
use crate::registry::DatasetRegistry;
use crate::resource::ResourceLoader;

/// Crops reported per region.
const TOP_CROPS_PER_REGION: usize = 3;

/// Inclusive year range over which aggregates are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    /// The window of `size` consecutive years ending at `anchor`.
    pub fn ending_at(anchor: i32, size: u32) -> Self {
        Self {
            start: anchor - size as i32 + 1,
            end: anchor,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

/// Average annual rainfall for one region over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallAverage {
    pub region: String,
    pub avg_rainfall_mm: f64,
}

/// Total production for one (region, crop) over the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropTotal {
    pub region: String,
    pub crop: String,
    pub total_production: f64,
}

/// The complete answer to one comparison question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Deterministic textual summary of both aggregates.
    pub summary: String,
    /// Average rainfall per requested region; a region with no data in the
    /// window produces no row rather than a zero.
    pub rainfall: Vec<RainfallAverage>,
    /// Top crops by total production, region-major, at most three each.
    pub top_crops: Vec<CropTotal>,
    /// Attribution strings, rainfall dataset first.
    pub citations: Vec<String>,
    /// The resolved year window.
    pub window: YearWindow,
}

/// Runs windowed comparisons against freshly loaded datasets.
///
/// Every call reloads and renormalizes both datasets; nothing is cached
/// between questions.
pub struct QueryEngine<'a> {
    registry: &'a DatasetRegistry,
    loader: &'a ResourceLoader,
}

impl<'a> QueryEngine<'a> {
    pub fn new(registry: &'a DatasetRegistry, loader: &'a ResourceLoader) -> Self {
        Self { registry, loader }
    }

    /// Compare rainfall and crop production between the query's two regions.
    ///
    /// The window anchors at the newest year in the rainfall data; rainfall
    /// with no resolvable years at all cannot anchor one and fails with
    /// `InsufficientData`.
    pub fn compare(&self, query: &StructuredQuery) -> Result<QueryResult> {
        let rainfall_info = self.registry.rainfall()?;
        let crop_info = self.registry.crop_production()?;

        let rainfall = normalize_rainfall(&self.loader.load(rainfall_info)?.records)?;
        let crops = normalize_crop(&self.loader.load(crop_info)?.records)?;

        let anchor = rainfall
            .iter()
            .map(|row| row.year)
            .max()
            .ok_or_else(|| {
                SamarthError::InsufficientData(
                    "rainfall data contains no usable year values".to_string(),
                )
            })?;
        let window = YearWindow::ending_at(anchor, query.window_years);

        let regions = [query.region_a.as_str(), query.region_b.as_str()];
        let rainfall_averages = average_rainfall(&rainfall, &window, &regions);
        let top_crops = top_crops(
            &crops,
            &window,
            &regions,
            query.crop_filter.as_deref(),
            TOP_CROPS_PER_REGION,
        );

        let summary = render_summary(query, &window, &rainfall_averages, &top_crops);
        let citations = vec![rainfall_info.citation(), crop_info.citation()];

        Ok(QueryResult {
            summary,
            rainfall: rainfall_averages,
            top_crops,
            citations,
            window,
        })
    }
}

/// Mean annual rainfall per requested region over the window. Regions with
/// no matching rows are omitted entirely.
fn average_rainfall(
    rainfall: &[RainfallRow],
    window: &YearWindow,
    regions: &[&str],
) -> Vec<RainfallAverage> {
    let mut averages = Vec::new();

    for &region in regions {
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in rainfall {
            if row.region == region && window.contains(row.year) {
                sum += row.annual_total_mm;
                count += 1;
            }
        }
        if count > 0 {
            averages.push(RainfallAverage {
                region: region.to_string(),
                avg_rainfall_mm: sum / count as f64,
            });
        }
    }

    averages
}

/// Top crops by total production per region over the window, region-major,
/// descending totals, ties broken by first encounter order.
fn top_crops(
    crops: &[CropRow],
    window: &YearWindow,
    regions: &[&str],
    crop_filter: Option<&str>,
    per_region: usize,
) -> Vec<CropTotal> {
    let mut result = Vec::new();

    for &region in regions {
        let mut totals: IndexMap<&str, f64> = IndexMap::new();
        for row in crops {
            if row.region != region || !window.contains(row.year) {
                continue;
            }
            if let Some(filter) = crop_filter {
                if row.crop != filter {
                    continue;
                }
            }
            *totals.entry(row.crop.as_str()).or_insert(0.0) += row.production;
        }

        let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
        // Stable sort keeps encounter order for equal totals.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(per_region);

        for (crop, total_production) in ranked {
            result.push(CropTotal {
                region: region.to_string(),
                crop: crop.to_string(),
                total_production,
            });
        }
    }

    result
}

fn rainfall_clause(region: &str, averages: &[RainfallAverage]) -> String {
    match averages.iter().find(|a| a.region == region) {
        Some(average) => format!(
            "{} averaged {:.2} mm of rainfall",
            region, average.avg_rainfall_mm
        ),
        None => format!("{} had no recorded rainfall data", region),
    }
}

fn render_summary(
    query: &StructuredQuery,
    window: &YearWindow,
    averages: &[RainfallAverage],
    top_crops: &[CropTotal],
) -> String {
    let mut summary = format!(
        "Between {}\u{2013}{}, {}, while {}.",
        window.start,
        window.end,
        rainfall_clause(&query.region_a, averages),
        rainfall_clause(&query.region_b, averages),
    );

    summary.push_str("\n\nTop crops produced were:\n");
    if top_crops.is_empty() {
        summary.push_str("none recorded in this window.");
    } else {
        let lines: Vec<String> = top_crops
            .iter()
            .map(|c| format!("{}: {} ({:.2})", c.region, c.crop, c.total_production))
            .collect();
        summary.push_str(&lines.join("\n"));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain(region: &str, year: i32, total: f64) -> RainfallRow {
        RainfallRow {
            region: region.to_string(),
            year,
            annual_total_mm: total,
        }
    }

    fn crop(region: &str, name: &str, year: i32, production: f64) -> CropRow {
        CropRow {
            region: region.to_string(),
            district: None,
            crop: name.to_string(),
            year,
            production,
        }
    }

    #[test]
    fn test_window_ending_at() {
        let window = YearWindow::ending_at(2022, 5);
        assert_eq!(window.start, 2018);
        assert_eq!(window.end, 2022);
        assert!(window.contains(2018));
        assert!(window.contains(2022));
        assert!(!window.contains(2017));
    }

    #[test]
    fn test_average_rainfall_omits_absent_region() {
        let rows = vec![rain("Gujarat", 2020, 800.0), rain("Gujarat", 2021, 900.0)];
        let window = YearWindow::ending_at(2021, 2);

        let averages = average_rainfall(&rows, &window, &["Gujarat", "Maharashtra"]);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].region, "Gujarat");
        assert!((averages[0].avg_rainfall_mm - 850.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_restricted_to_window() {
        let rows = vec![
            rain("Gujarat", 2015, 9999.0),
            rain("Gujarat", 2020, 800.0),
            rain("Gujarat", 2021, 900.0),
        ];
        let window = YearWindow::ending_at(2021, 2);

        let averages = average_rainfall(&rows, &window, &["Gujarat"]);
        assert!((averages[0].avg_rainfall_mm - 850.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_crops_truncated_to_three() {
        let rows = vec![
            crop("Gujarat", "Rice", 2020, 10.0),
            crop("Gujarat", "Wheat", 2020, 40.0),
            crop("Gujarat", "Cotton(lint)", 2020, 30.0),
            crop("Gujarat", "Potato", 2020, 20.0),
        ];
        let window = YearWindow::ending_at(2020, 1);

        let top = top_crops(&rows, &window, &["Gujarat"], None, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].crop, "Wheat");
        assert_eq!(top[1].crop, "Cotton(lint)");
        assert_eq!(top[2].crop, "Potato");
    }

    #[test]
    fn test_top_crops_ties_keep_encounter_order() {
        let rows = vec![
            crop("Gujarat", "Rice", 2020, 25.0),
            crop("Gujarat", "Wheat", 2020, 25.0),
            crop("Gujarat", "Potato", 2020, 25.0),
        ];
        let window = YearWindow::ending_at(2020, 1);

        let top = top_crops(&rows, &window, &["Gujarat"], None, 3);
        let names: Vec<&str> = top.iter().map(|c| c.crop.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Wheat", "Potato"]);
    }

    #[test]
    fn test_top_crops_sums_across_years_and_districts() {
        let rows = vec![
            crop("Gujarat", "Rice", 2019, 10.0),
            crop("Gujarat", "Rice", 2020, 15.0),
        ];
        let window = YearWindow::ending_at(2020, 2);

        let top = top_crops(&rows, &window, &["Gujarat"], None, 3);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].total_production, 25.0);
    }

    #[test]
    fn test_crop_filter_restricts_aggregate() {
        let rows = vec![
            crop("Gujarat", "Rice", 2020, 10.0),
            crop("Gujarat", "Wheat", 2020, 40.0),
        ];
        let window = YearWindow::ending_at(2020, 1);

        let top = top_crops(&rows, &window, &["Gujarat"], Some("Rice"), 3);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].crop, "Rice");
    }

    #[test]
    fn test_region_major_ordering() {
        let rows = vec![
            crop("Maharashtra", "Sugarcane", 2020, 99.0),
            crop("Gujarat", "Rice", 2020, 1.0),
        ];
        let window = YearWindow::ending_at(2020, 1);

        let top = top_crops(&rows, &window, &["Gujarat", "Maharashtra"], None, 3);
        assert_eq!(top[0].region, "Gujarat");
        assert_eq!(top[1].region, "Maharashtra");
    }

    #[test]
    fn test_summary_reports_absent_region_as_no_data() {
        let query = StructuredQuery {
            region_a: "Gujarat".to_string(),
            region_b: "Maharashtra".to_string(),
            crop_filter: None,
            window_years: 2,
        };
        let window = YearWindow::ending_at(2021, 2);
        let averages = vec![RainfallAverage {
            region: "Maharashtra".to_string(),
            avg_rainfall_mm: 1032.5,
        }];

        let summary = render_summary(&query, &window, &averages, &[]);
        assert!(summary.contains("Gujarat had no recorded rainfall data"));
        assert!(summary.contains("Maharashtra averaged 1032.50 mm"));
        assert!(!summary.contains("0.00 mm"));
    }
}
