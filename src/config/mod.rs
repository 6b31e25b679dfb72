//! Bootstrap configuration of the pipeline process.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PipelineConfig (validated, immutable)
//!     → seeds the Reconciler, logging, metrics, admin API
//!
//! While running:
//!     watcher.rs detects a change of the local override file
//!     → ReloadTrigger to the reconcile scheduler
//! ```
//!
//! # Design Decisions
//! - Bootstrap config is loaded once; live settings come from the sources
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::AdminConfig;
pub use schema::ObservabilityConfig;
pub use schema::PipelineConfig;
pub use watcher::LocalFileWatcher;
