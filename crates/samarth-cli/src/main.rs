//! Samarth CLI - agricultural rainfall and crop Q&A.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask {
            question,
            registry,
            snapshot_dir,
            json,
        } => commands::ask::run(question, registry, snapshot_dir, json, cli.verbose),

        Commands::Datasets { registry, json } => {
            commands::datasets::run(registry, json, cli.verbose)
        }

        Commands::Fetch {
            dataset,
            registry,
            limit,
            output,
        } => commands::fetch::run(dataset, registry, limit, output, cli.verbose),

        Commands::Suggest => commands::suggest::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
