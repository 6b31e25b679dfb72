//! Remote source over HTTP(S).

use std::time::Duration;

use tokio::time;

use super::SourceError;
use crate::kv::{parse_kv, KeyValueConfig};

/// Check that `url` is an absolute HTTP(S) URL.
pub fn parse_source_url(url: &str) -> Result<url::Url, SourceError> {
    let parsed = url::Url::parse(url).map_err(|e| SourceError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SourceError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Download and parse the remote config. A blank URL yields an empty mapping.
pub async fn read_remote(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<KeyValueConfig, SourceError> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(KeyValueConfig::new());
    }
    let parsed = parse_source_url(url)?;

    let fetch = async {
        let response = client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        // Decodes per the response charset and drops a byte order mark.
        Ok(response.text().await?)
    };

    let body = match time::timeout(timeout, fetch).await {
        Ok(result) => result?,
        Err(_) => return Err(SourceError::Timeout(timeout)),
    };

    Ok(parse_kv(&body))
}
