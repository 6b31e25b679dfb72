//! Checks consumed by the signal and execution side.
//!
//! Neither module touches configuration state; both read the active
//! configuration published by the reconciler.

pub mod filters;
pub mod mode;

pub use filters::{Bar, Direction, EntryFilters};
pub use mode::{is_simulated_account, mode_matches, AccountMode};
