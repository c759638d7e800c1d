//! Resource loader: snapshot-or-remote record acquisition per dataset.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Result, SamarthError};
use crate::registry::DatasetInfo;
use super::fetcher::{HttpFetcher, ResourceFetcher};
use super::snapshot::{read_snapshot, SnapshotMetadata};
use super::RawRecord;

/// Default record limit for remote fetches.
const DEFAULT_LIMIT: usize = 10_000;

/// Where a loaded resource came from.
#[derive(Debug, Clone)]
pub enum ResourceOrigin {
    /// Read from a local snapshot file.
    Snapshot(SnapshotMetadata),
    /// Fetched from the remote resource API.
    Remote {
        resource_id: String,
        fetched_at: DateTime<Utc>,
    },
}

/// Raw records for one dataset together with their provenance.
#[derive(Debug, Clone)]
pub struct LoadedResource {
    pub records: Vec<RawRecord>,
    pub origin: ResourceOrigin,
}

/// Obtains raw tabular data for a registered dataset.
///
/// A dataset with a snapshot file on disk is read locally; anything else
/// goes through the remote fetcher. Fetched payloads are not written back
/// to disk, so repeated loads of a remote dataset re-fetch every time.
pub struct ResourceLoader {
    fetcher: Arc<dyn ResourceFetcher>,
    snapshot_dir: PathBuf,
    limit: usize,
}

impl ResourceLoader {
    /// Create a loader backed by the default HTTP fetcher.
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }

    /// Create a loader with a custom transport.
    pub fn with_fetcher(fetcher: impl ResourceFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            snapshot_dir: PathBuf::from("."),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the directory snapshot file names are resolved against.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    /// Set the record limit for remote fetches.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Load raw records for a dataset.
    ///
    /// Fails with `DataUnavailable` when the remote call errors after
    /// retries, or when it returns no records and no snapshot exists.
    pub fn load(&self, dataset: &DatasetInfo) -> Result<LoadedResource> {
        if let Some(ref snapshot) = dataset.snapshot {
            let path = self.snapshot_dir.join(snapshot);
            if path.exists() {
                let (records, metadata) = read_snapshot(&path)?;
                return Ok(LoadedResource {
                    records,
                    origin: ResourceOrigin::Snapshot(metadata),
                });
            }
        }

        let records = self.fetcher.fetch(&dataset.resource_id, self.limit, 0)?;
        if records.is_empty() {
            return Err(SamarthError::DataUnavailable(format!(
                "resource '{}' returned no records and no local snapshot exists",
                dataset.resource_id
            )));
        }

        Ok(LoadedResource {
            records,
            origin: ResourceOrigin::Remote {
                resource_id: dataset.resource_id.clone(),
                fetched_at: Utc::now(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::StaticFetcher;
    use serde_json::json;
    use std::io::Write;

    fn dataset(resource_id: &str, snapshot: Option<&str>) -> DatasetInfo {
        DatasetInfo {
            resource_id: resource_id.to_string(),
            title: "Test".to_string(),
            source: "Test Source".to_string(),
            snapshot: snapshot.map(PathBuf::from),
        }
    }

    #[test]
    fn test_load_prefers_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("rain.csv")).unwrap();
        writeln!(file, "state,year\nGujarat,2020").unwrap();

        let loader = ResourceLoader::with_fetcher(StaticFetcher::new())
            .with_snapshot_dir(dir.path());
        let loaded = loader.load(&dataset("remote-id", Some("rain.csv"))).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert!(matches!(loaded.origin, ResourceOrigin::Snapshot(_)));
    }

    #[test]
    fn test_load_falls_through_to_remote_when_snapshot_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::new().with_records(
            "remote-id",
            vec![[("state".to_string(), json!("Kerala"))].into_iter().collect()],
        );

        let loader = ResourceLoader::with_fetcher(fetcher).with_snapshot_dir(dir.path());
        let loaded = loader.load(&dataset("remote-id", Some("missing.csv"))).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert!(matches!(loaded.origin, ResourceOrigin::Remote { .. }));
    }

    #[test]
    fn test_load_empty_remote_is_unavailable() {
        let loader = ResourceLoader::with_fetcher(StaticFetcher::new());
        let result = loader.load(&dataset("remote-id", None));

        assert!(matches!(result, Err(SamarthError::DataUnavailable(_))));
    }
}
