//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → reconciler loop exits → admin API drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger immediate reconcile
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then reconciler and API
//! - The reconciler finishes its current tick before it stops

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
