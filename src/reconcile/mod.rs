//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (timer / reload trigger)
//!     → reconciler.rs
//!         Fetching:   source::SourceReader (remote, local)
//!                     kv::merge (local wins)
//!                     kv::content_hash == applied hash? → Idle
//!         Validating: settings::validate (bounds in effect)
//!             ok   → Applied: apply, persist last-known-good
//!             fail → load last-known-good, validate
//!                      ok   → FallbackApplied
//!                      fail → Rejected (nothing changes)
//!     → handle.rs (publish Snapshot for readers)
//! ```
//!
//! # Design Decisions
//! - One owned Reconciler holds all mutable state; readers get snapshots
//! - No error escapes a tick; the worst case is a stale configuration
//! - A rejected payload does not update the applied hash, so it is
//!   re-validated (and rejected) on every tick until it changes

pub mod handle;
pub mod reconciler;
pub mod scheduler;
pub mod state;

pub use handle::{ConfigHandle, Snapshot};
pub use reconciler::Reconciler;
pub use scheduler::ReloadTrigger;
pub use state::{ReconcileState, TickOutcome};
