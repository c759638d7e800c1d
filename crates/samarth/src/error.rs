//! Error types for the Samarth library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Samarth operations.
#[derive(Debug, Error)]
pub enum SamarthError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote fetch failed or returned no records with no local fallback.
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    /// Required schema fields could not be resolved during normalization.
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// The loaded data cannot anchor an analysis window.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Samarth operations.
pub type Result<T> = std::result::Result<T, SamarthError>;
