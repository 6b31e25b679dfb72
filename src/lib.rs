//! Live-updatable trading configuration pipeline.
//!
//! Polls a remote and a local key=value source, merges them (local wins),
//! detects content changes by hash, validates against bounds, and applies
//! the result or falls back to the last-known-good snapshot on disk.
//! Strategy code reads the active configuration through a [`ConfigHandle`].

// Live configuration
pub mod kv;
pub mod reconcile;
pub mod settings;
pub mod source;

// Strategy-side consumers
pub mod guard;

// Process plumbing
pub mod admin;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::schema::PipelineConfig;
pub use lifecycle::Shutdown;
pub use reconcile::{ConfigHandle, Reconciler};
