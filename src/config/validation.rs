//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the remote URL and bind addresses
//! - Check the seeded settings against the seeded bounds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PipelineConfig → Result<(), Vec<ValidationError>>
//! - Runs once at startup; the process refuses to start on error

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::PipelineConfig;
use crate::kv::KeyValueConfig;
use crate::settings::{self, ValidationReport};
use crate::source::remote::parse_source_url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("sources.remote_url: {0}")]
    RemoteUrl(String),

    #[error("fetch.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("defaults.poll_seconds must be at least 1")]
    PollInterval,

    #[error("{field}: invalid socket address '{value}'")]
    Address { field: &'static str, value: String },

    #[error("defaults rejected: {0}")]
    Defaults(ValidationReport),
}

/// Validate the bootstrap configuration, collecting every problem.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = config.sources.remote_url.trim();
    if !url.is_empty() {
        if let Err(e) = parse_source_url(url) {
            errors.push(ValidationError::RemoteUrl(e.to_string()));
        }
    }

    if config.fetch.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.defaults.poll_seconds == 0 {
        errors.push(ValidationError::PollInterval);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }

    // Seeded settings must satisfy the seeded bounds.
    if let Err(report) = settings::validate(&KeyValueConfig::new(), &config.defaults, &config.bounds)
    {
        errors.push(ValidationError::Defaults(report));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
