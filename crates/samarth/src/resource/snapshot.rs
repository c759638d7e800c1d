//! Flat-file snapshot reading and writing.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Result, SamarthError};
use super::RawRecord;

/// Provenance metadata recorded for every snapshot read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the snapshot.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the snapshot was read.
    pub loaded_at: DateTime<Utc>,
}

/// Read a CSV snapshot into raw records plus provenance metadata.
///
/// Every cell becomes a JSON string value keyed by its header; typing is
/// deferred to the normalizer.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<(Vec<RawRecord>, SnapshotMetadata)> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|e| SamarthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| SamarthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_slice());

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter().chain(std::iter::repeat("")))
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        records.push(record);
    }

    let metadata = SnapshotMetadata {
        file: path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        hash,
        size_bytes: contents.len() as u64,
        row_count: records.len(),
        column_count: headers.len(),
        loaded_at: Utc::now(),
    };

    Ok((records, metadata))
}

/// Write raw records to a CSV snapshot.
///
/// The header is the column union across all records in first-seen order;
/// columns missing from a record are written as empty cells.
pub fn write_snapshot(path: impl AsRef<Path>, records: &[RawRecord]) -> Result<()> {
    let path = path.as_ref();

    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let file = File::create(path).map_err(|e| SamarthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&headers)?;
    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.get(*h).map(render_cell).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|e| SamarthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
