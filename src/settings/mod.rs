//! Typed trading settings, their bounds, validation and persistence.
//!
//! # Data Flow
//! ```text
//! merged KeyValueConfig
//!     → validator.rs (against ValidationBounds in effect)
//!     → active.rs (ActiveConfig::applied_from)
//!     → bounds.rs (ValidationBounds::updated_from)
//!     → lkg.rs (snapshot for fallback)
//! ```
//!
//! # Design Decisions
//! - Minimums are constants; maximums are configuration
//! - A payload is validated against the bounds in effect before it,
//!   bounds it carries only take effect once the whole payload passes

pub mod active;
pub mod bounds;
pub mod lkg;
pub mod validator;

pub use active::ActiveConfig;
pub use bounds::ValidationBounds;
pub use lkg::LkgStore;
pub use validator::{validate, ValidationCause, ValidationReport, Violation};
