//! Dataset registry: logical dataset names mapped to resource metadata.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SamarthError};

/// Logical name of the rainfall dataset.
pub const RAINFALL: &str = "rainfall";

/// Logical name of the crop production dataset.
pub const CROP_PRODUCTION: &str = "crop_production";

/// Metadata describing one registered dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Resource identifier on the remote portal.
    pub resource_id: String,
    /// Human-readable dataset title.
    pub title: String,
    /// Source attribution string.
    pub source: String,
    /// Local snapshot file name, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

impl DatasetInfo {
    /// Format the citation string for this dataset.
    pub fn citation(&self) -> String {
        format!("{} (Source: {})", self.title, self.source)
    }
}

/// Read-only mapping of logical dataset names to their metadata.
///
/// Passed explicitly to the loader and the query engine rather than living
/// as ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetRegistry {
    datasets: IndexMap<String, DatasetInfo>,
}

impl DatasetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            datasets: IndexMap::new(),
        }
    }

    /// Load a registry from a JSON file (`datasets_info.json` layout).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SamarthError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Register or replace a dataset.
    pub fn with_dataset(mut self, name: impl Into<String>, info: DatasetInfo) -> Self {
        self.datasets.insert(name.into(), info);
        self
    }

    /// Look up a dataset by logical name.
    pub fn get(&self, name: &str) -> Option<&DatasetInfo> {
        self.datasets.get(name)
    }

    /// The rainfall dataset, required for every comparison.
    pub fn rainfall(&self) -> Result<&DatasetInfo> {
        self.require(RAINFALL)
    }

    /// The crop production dataset, required for every comparison.
    pub fn crop_production(&self) -> Result<&DatasetInfo> {
        self.require(CROP_PRODUCTION)
    }

    /// Iterate over registered (name, info) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatasetInfo)> {
        self.datasets.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, name: &str) -> Result<&DatasetInfo> {
        self.get(name).ok_or_else(|| {
            SamarthError::Config(format!("dataset '{}' is not registered", name))
        })
    }
}

impl Default for DatasetRegistry {
    /// The built-in registry: the two data.gov.in datasets the engine was
    /// written for, each with a local snapshot fallback.
    fn default() -> Self {
        Self::new()
            .with_dataset(
                RAINFALL,
                DatasetInfo {
                    resource_id: "102a9f85-9ccf-4c87-a22f-44780c596027".to_string(),
                    title: "Sub Divisional Monthly Rainfall".to_string(),
                    source: "India Meteorological Department".to_string(),
                    snapshot: Some(PathBuf::from("rainfall_data.csv")),
                },
            )
            .with_dataset(
                CROP_PRODUCTION,
                DatasetInfo {
                    resource_id: "9ef84268-d588-465a-a308-a864a43d0070".to_string(),
                    title: "District-wise Season-wise Crop Production Statistics".to_string(),
                    source: "Ministry of Agriculture and Farmers Welfare".to_string(),
                    snapshot: Some(PathBuf::from("crop_yield.csv")),
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_registry_has_both_datasets() {
        let registry = DatasetRegistry::default();
        assert!(registry.rainfall().is_ok());
        assert!(registry.crop_production().is_ok());
    }

    #[test]
    fn test_citation_format() {
        let registry = DatasetRegistry::default();
        let citation = registry.rainfall().unwrap().citation();
        assert_eq!(
            citation,
            "Sub Divisional Monthly Rainfall (Source: India Meteorological Department)"
        );
    }

    #[test]
    fn test_missing_dataset_is_config_error() {
        let registry = DatasetRegistry::new();
        assert!(matches!(
            registry.rainfall(),
            Err(SamarthError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "rainfall": {
                    "resource_id": "abc-123",
                    "title": "Monthly Rainfall",
                    "source": "IMD"
                }
            }"#,
        )
        .unwrap();

        let registry = DatasetRegistry::from_file(file.path()).unwrap();
        let info = registry.rainfall().unwrap();
        assert_eq!(info.resource_id, "abc-123");
        assert!(info.snapshot.is_none());
    }
}
