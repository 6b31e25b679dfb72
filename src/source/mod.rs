//! Configuration source readers.
//!
//! # Responsibilities
//! - Download remote `key=value` text over HTTP(S)
//! - Read the optional local override file
//!
//! # Design Decisions
//! - `read_*` return `Result` so the cause of a degraded source is visible
//! - `fetch_*` are total: every failure becomes an empty mapping
//! - Every remote call has a deadline

pub mod local;
pub mod remote;

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::kv::KeyValueConfig;
use crate::observability::metrics;

pub use local::read_local;

/// Why a source could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured URL does not parse or is not HTTP(S).
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection or transfer failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The remote did not answer within the deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads remote and local configuration sources.
#[derive(Clone)]
pub struct SourceReader {
    client: reqwest::Client,
    timeout: Duration,
}

impl SourceReader {
    /// Create a reader whose remote requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Fallible remote read.
    pub async fn read_remote(&self, url: &str) -> Result<KeyValueConfig, SourceError> {
        remote::read_remote(&self.client, url, self.timeout).await
    }

    /// Fetch the remote source, degrading to an empty mapping on any failure.
    pub async fn fetch_remote(&self, url: &str) -> KeyValueConfig {
        match self.read_remote(url).await {
            Ok(kv) => kv,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Remote config unavailable, treating as empty");
                metrics::record_source_failure("remote");
                KeyValueConfig::new()
            }
        }
    }

    /// Fallible local read.
    pub async fn read_local(&self, path: Option<&Path>) -> Result<KeyValueConfig, SourceError> {
        local::read_local(path).await
    }

    /// Fetch the local source, degrading to an empty mapping on any failure.
    pub async fn fetch_local(&self, path: Option<&Path>) -> KeyValueConfig {
        match self.read_local(path).await {
            Ok(kv) => kv,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Local config unreadable, treating as empty");
                metrics::record_source_failure("local");
                KeyValueConfig::new()
            }
        }
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}
