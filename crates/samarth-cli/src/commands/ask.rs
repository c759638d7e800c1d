//! Ask command - answer a natural-language question.

use std::path::PathBuf;

use colored::Colorize;
use samarth::{HttpFetcher, ResourceLoader, Samarth};

pub fn run(
    question: String,
    registry: Option<PathBuf>,
    snapshot_dir: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = super::load_registry(registry)?;

    let mut loader = ResourceLoader::with_fetcher(
        HttpFetcher::from_env().or_else(|_| HttpFetcher::new())?,
    );
    if let Some(dir) = snapshot_dir {
        loader = loader.with_snapshot_dir(dir);
    }

    let samarth = Samarth::new()?.with_registry(registry).with_loader(loader);

    if verbose {
        let query = samarth.plan(&question);
        eprintln!(
            "{} regions: {} vs {}, crop filter: {}, window: {} years",
            "Extracted".dimmed(),
            query.region_a,
            query.region_b,
            query.crop_filter.as_deref().unwrap_or("none"),
            query.window_years
        );
    }

    let result = samarth.answer(&question)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.summary);
    println!();

    println!("{}", "Rainfall comparison:".cyan().bold());
    if result.rainfall.is_empty() {
        println!("  (no data in the {}-{} window)", result.window.start, result.window.end);
    }
    for row in &result.rainfall {
        println!(
            "  {:<24} {:>10.2} mm",
            row.region,
            row.avg_rainfall_mm
        );
    }
    println!();

    println!("{}", "Top crops by production:".cyan().bold());
    if result.top_crops.is_empty() {
        println!("  (no data in the {}-{} window)", result.window.start, result.window.end);
    }
    for row in &result.top_crops {
        println!(
            "  {:<24} {:<20} {:>14.2}",
            row.region, row.crop, row.total_production
        );
    }
    println!();

    println!("{}", "Sources:".yellow().bold());
    for citation in &result.citations {
        println!("  - {}", citation);
    }

    Ok(())
}
