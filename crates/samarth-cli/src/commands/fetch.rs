//! Fetch command - pull raw records for one dataset.

use std::path::PathBuf;

use colored::Colorize;
use samarth::resource::{write_snapshot, HttpFetcher, ResourceFetcher};

pub fn run(
    dataset: String,
    registry: Option<PathBuf>,
    limit: usize,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = super::load_registry(registry)?;
    let info = registry
        .get(&dataset)
        .ok_or_else(|| format!("dataset '{}' is not registered", dataset))?;

    let fetcher = HttpFetcher::from_env().or_else(|_| HttpFetcher::new())?;
    let records = fetcher.fetch(&info.resource_id, limit, 0)?;

    println!(
        "{} {} record(s) for '{}'",
        "Fetched".green().bold(),
        records.len(),
        dataset
    );

    if verbose {
        if let Some(first) = records.first() {
            let columns: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
            eprintln!("{} {}", "Columns:".dimmed(), columns.join(", "));
        }
    }

    if let Some(path) = output {
        write_snapshot(&path, &records)?;
        println!("Saved snapshot to {}", path.display().to_string().cyan());
    }

    Ok(())
}
