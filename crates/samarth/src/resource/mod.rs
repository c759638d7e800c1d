//! Resource loading: raw tabular records from snapshots or the remote API.

mod fetcher;
mod loader;
mod snapshot;

use indexmap::IndexMap;

pub use fetcher::{FetcherConfig, HttpFetcher, ResourceFetcher, StaticFetcher};
pub use loader::{LoadedResource, ResourceLoader, ResourceOrigin};
pub use snapshot::{read_snapshot, write_snapshot, SnapshotMetadata};

/// One untyped row as returned by a loader: column name -> scalar value.
///
/// Insertion order is preserved because downstream tie-breaks depend on
/// encounter order.
pub type RawRecord = IndexMap<String, serde_json::Value>;
