//! Local override file.

use std::path::Path;

use super::SourceError;
use crate::kv::{parse_kv, KeyValueConfig};

/// Read and parse a local config file.
///
/// A missing path, a blank path or a file that does not exist all yield an
/// empty mapping. Other filesystem errors are returned.
pub async fn read_local(path: Option<&Path>) -> Result<KeyValueConfig, SourceError> {
    let Some(path) = path else {
        return Ok(KeyValueConfig::new());
    };
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Ok(KeyValueConfig::new());
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(parse_kv(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KeyValueConfig::new()),
        Err(e) => Err(SourceError::Io(e)),
    }
}
