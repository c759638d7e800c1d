//! Remote resource fetching against the data.gov.in resource API.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Result, SamarthError};
use super::RawRecord;

/// Transport seam: anything that can produce raw records for a resource id.
///
/// The HTTP implementation talks to the real API; tests swap in a
/// [`StaticFetcher`] with canned records.
pub trait ResourceFetcher: Send + Sync {
    /// Fetch up to `limit` records for the given resource, starting at `offset`.
    fn fetch(&self, resource_id: &str, limit: usize, offset: usize) -> Result<Vec<RawRecord>>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL of the resource API.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Retries for transient failures (429 and 5xx).
    pub max_retries: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.data.gov.in".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

/// JSON envelope returned by the resource API. The records list is either
/// top-level or nested under `result`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    records: Vec<RawRecord>,
    #[serde(default)]
    result: Option<NestedResult>,
}

#[derive(Debug, Deserialize)]
struct NestedResult {
    #[serde(default)]
    records: Vec<RawRecord>,
}

impl Envelope {
    fn into_records(self) -> Vec<RawRecord> {
        if !self.records.is_empty() {
            self.records
        } else {
            self.result.map(|r| r.records).unwrap_or_default()
        }
    }
}

/// Transient status classes worth another attempt.
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Blocking HTTP fetcher with bounded retries.
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Create a fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher with custom configuration.
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SamarthError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a fetcher taking the API key from `DATA_GOV_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DATA_GOV_API_KEY").map_err(|_| {
            SamarthError::Config("DATA_GOV_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(FetcherConfig {
            api_key: Some(api_key),
            ..FetcherConfig::default()
        })
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, resource_id: &str, limit: usize, offset: usize) -> Result<Vec<RawRecord>> {
        let url = format!("{}/resource/{}", self.config.base_url, resource_id);
        let limit = limit.to_string();
        let offset = offset.to_string();

        let mut query: Vec<(&str, &str)> = vec![
            ("format", "json"),
            ("limit", &limit),
            ("offset", &offset),
        ];
        if let Some(ref key) = self.config.api_key {
            query.push(("api-key", key.as_str()));
        }

        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Linear backoff between attempts.
                thread::sleep(Duration::from_secs(attempt as u64));
            }

            let response = match self.client.get(&url).query(&query).send() {
                Ok(response) => response,
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.config.max_retries => {
                    last_err = Some(e.into());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            if status.is_success() {
                let envelope: Envelope = response.json()?;
                return Ok(envelope.into_records());
            }

            let body = response.text().unwrap_or_default();
            let err = SamarthError::DataUnavailable(format!(
                "resource '{}' returned HTTP {}: {}",
                resource_id, status, body
            ));
            if is_retryable(status) && attempt < self.config.max_retries {
                last_err = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(last_err.unwrap_or_else(|| {
            SamarthError::DataUnavailable(format!("resource '{}' could not be fetched", resource_id))
        }))
    }
}

/// In-memory fetcher serving canned records, keyed by resource id.
///
/// Used by tests and offline demos in place of [`HttpFetcher`].
#[derive(Debug, Default)]
pub struct StaticFetcher {
    records: HashMap<String, Vec<RawRecord>>,
}

impl StaticFetcher {
    /// Create an empty fetcher; unknown resources yield no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register canned records for a resource id.
    pub fn with_records(mut self, resource_id: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.records.insert(resource_id.into(), records);
        self
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch(&self, resource_id: &str, limit: usize, offset: usize) -> Result<Vec<RawRecord>> {
        let all = self.records.get(resource_id).cloned().unwrap_or_default();
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_envelope_top_level_records() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"records": [{"state": "Gujarat"}]}"#).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["state"], json!("Gujarat"));
    }

    #[test]
    fn test_envelope_nested_records() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"result": {"records": [{"state": "Kerala"}]}}"#).unwrap();
        let records = envelope.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["state"], json!("Kerala"));
    }

    #[test]
    fn test_envelope_no_records() {
        let envelope: Envelope = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(envelope.into_records().is_empty());
    }

    #[test]
    fn test_static_fetcher_limit_and_offset() {
        let records = vec![
            record(&[("year", json!(2020))]),
            record(&[("year", json!(2021))]),
            record(&[("year", json!(2022))]),
        ];
        let fetcher = StaticFetcher::new().with_records("rain", records);

        let page = fetcher.fetch("rain", 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["year"], json!(2021));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }
}
