//! Samarth: question answering over regional rainfall and crop statistics.
//!
//! Samarth loads heterogeneous tabular datasets, normalizes them into two
//! canonical schemas, extracts query parameters from a free-text question,
//! and runs windowed aggregate comparisons.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same question over the same data always
//!   produces the same summary, tables, and citations
//! - **Fresh**: every question reloads and renormalizes its inputs
//! - **Attributed**: every answer cites the datasets it was computed from
//!
//! # Example
//!
//! ```no_run
//! use samarth::Samarth;
//!
//! let samarth = Samarth::new().unwrap();
//! let result = samarth.answer("Compare rainfall in Gujarat and Kerala last 5 years").unwrap();
//!
//! println!("{}", result.summary);
//! for citation in &result.citations {
//!     println!("- {}", citation);
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod query;
pub mod question;
pub mod registry;
pub mod resource;

mod samarth;

pub use crate::samarth::{suggested_questions, Samarth};
pub use catalog::EntityCatalog;
pub use error::{Result, SamarthError};
pub use normalize::{normalize_crop, normalize_rainfall, CropRow, RainfallRow};
pub use query::{CropTotal, QueryResult, RainfallAverage, YearWindow};
pub use question::{extract, StructuredQuery};
pub use registry::{DatasetInfo, DatasetRegistry};
pub use resource::{
    FetcherConfig, HttpFetcher, LoadedResource, RawRecord, ResourceFetcher, ResourceLoader,
    ResourceOrigin, SnapshotMetadata, StaticFetcher,
};
