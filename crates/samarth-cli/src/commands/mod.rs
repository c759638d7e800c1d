//! CLI command implementations.

pub mod ask;
pub mod datasets;
pub mod fetch;
pub mod suggest;

use std::path::PathBuf;

use samarth::DatasetRegistry;

/// Load the registry from a file, or fall back to the built-in one.
pub fn load_registry(
    path: Option<PathBuf>,
) -> Result<DatasetRegistry, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(DatasetRegistry::from_file(path)?),
        None => Ok(DatasetRegistry::default()),
    }
}
