//! Configuration schema definitions.
//!
//! This module defines the bootstrap configuration of the pipeline process.
//! All types derive Serde traits for deserialization from a TOML file. The
//! live trading settings are not configured here but fetched at runtime; the
//! `defaults` and `bounds` sections only seed them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::settings::{ActiveConfig, ValidationBounds};

/// Root configuration for the pipeline process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where live configuration is fetched from.
    pub sources: SourcesConfig,

    /// Remote fetch settings.
    pub fetch: FetchConfig,

    /// Last-known-good snapshot settings.
    pub lkg: LkgConfig,

    /// Account mode guard settings.
    pub guard: GuardConfig,

    /// Settings in effect before the first successful apply.
    pub defaults: ActiveConfig,

    /// Bound maximums in effect before the first successful apply.
    pub bounds: ValidationBounds,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SourcesConfig {
    /// Remote `key=value` document (HTTP or HTTPS). Empty disables it.
    pub remote_url: String,

    /// Optional local override file; its keys win over the remote ones.
    pub local_path: Option<PathBuf>,
}

/// Remote fetch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Deadline for one remote fetch in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Last-known-good settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LkgConfig {
    /// Snapshot path. Defaults to a file under the documents directory.
    pub path: Option<PathBuf>,
}

/// Account mode guard.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Block activity when the account class contradicts `account_mode`.
    pub enforce_account_mode: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enforce_account_mode: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the read-only admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token). Empty disables auth.
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Local override file watching.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Reconcile as soon as the local override file changes.
    pub enabled: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
