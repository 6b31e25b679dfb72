//! Last-known-good persistence.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::kv::KeyValueConfig;
use crate::observability::metrics;
use crate::source::read_local;

/// File name of the default snapshot.
pub const LKG_FILE_NAME: &str = "trade_template_last_good.config";

/// Directory created under the user's documents folder.
pub const LKG_DIR_NAME: &str = "trade-template";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write last-known-good to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Default snapshot location under the documents directory.
pub fn default_lkg_path() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LKG_DIR_NAME)
        .join(LKG_FILE_NAME)
}

/// Reads and writes the last-known-good snapshot.
#[derive(Debug, Clone)]
pub struct LkgStore {
    default_path: PathBuf,
}

impl LkgStore {
    /// `path` replaces the documents-folder default when given.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            default_path: path.unwrap_or_else(default_lkg_path),
        }
    }

    /// The applied `lkg_path` override if any, else the store default.
    pub fn resolve<'a>(&'a self, override_path: Option<&'a Path>) -> &'a Path {
        override_path.unwrap_or(&self.default_path)
    }

    /// Write `kv` to `path`, replacing previous content.
    pub async fn try_save(&self, kv: &KeyValueConfig, path: &Path) -> Result<(), PersistError> {
        let wrap = |source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(wrap)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, kv.to_text()).await.map_err(wrap)?;
        tokio::fs::rename(&tmp, path).await.map_err(wrap)?;
        Ok(())
    }

    /// Best-effort save. Failures are logged and swallowed.
    pub async fn save(&self, kv: &KeyValueConfig, path: &Path) -> bool {
        match self.try_save(kv, path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), keys = kv.len(), "Last-known-good saved");
                metrics::record_lkg_write(true);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not persist last-known-good");
                metrics::record_lkg_write(false);
                false
            }
        }
    }

    /// Load the snapshot at `path`. Missing or unreadable files are empty.
    pub async fn load(&self, path: &Path) -> KeyValueConfig {
        match read_local(Some(path)).await {
            Ok(kv) => kv,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Last-known-good unreadable");
                KeyValueConfig::new()
            }
        }
    }
}
