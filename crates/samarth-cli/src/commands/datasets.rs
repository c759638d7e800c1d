//! Datasets command - list the registered datasets.

use std::path::PathBuf;

use colored::Colorize;

pub fn run(
    registry: Option<PathBuf>,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = super::load_registry(registry)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    for (name, info) in registry.iter() {
        println!("{}", name.cyan().bold());
        println!("  Title:       {}", info.title);
        println!("  Source:      {}", info.source);
        println!("  Resource id: {}", info.resource_id);
        if let Some(ref snapshot) = info.snapshot {
            println!("  Snapshot:    {}", snapshot.display());
        }
        println!("  Citation:    {}", info.citation().dimmed());
        println!();
    }

    Ok(())
}
