//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Samarth: rainfall and crop-production Q&A engine
#[derive(Parser)]
#[command(name = "samarth")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a natural-language question about rainfall and crops
    Ask {
        /// The question text
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Dataset registry JSON file (default: built-in registry)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Directory snapshot file names are resolved against
        #[arg(short, long)]
        snapshot_dir: Option<PathBuf>,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered datasets
    Datasets {
        /// Dataset registry JSON file (default: built-in registry)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a dataset's raw records from the remote API
    Fetch {
        /// Logical dataset name (e.g. rainfall, crop_production)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// Dataset registry JSON file (default: built-in registry)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Maximum records to fetch
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Write the fetched records to this CSV snapshot
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print example questions the engine handles well
    Suggest,
}
