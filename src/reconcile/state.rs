//! Poll/apply states and tick outcomes.

use serde::Serialize;

use crate::settings::ValidationCause;

/// Where the reconciler is in its poll/apply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    Idle,
    Fetching,
    Validating,
    Applied,
    FallbackApplied,
    Rejected,
}

impl ReconcileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileState::Idle => "idle",
            ReconcileState::Fetching => "fetching",
            ReconcileState::Validating => "validating",
            ReconcileState::Applied => "applied",
            ReconcileState::FallbackApplied => "fallback_applied",
            ReconcileState::Rejected => "rejected",
        }
    }
}

/// Result of one reconcile tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Both sources produced no content.
    Empty,
    /// Content hashes equal to what is already applied.
    Unchanged,
    /// Fresh content validated and applied.
    Applied { hash: String },
    /// Fresh content was rejected; the last-known-good snapshot was applied.
    FallbackApplied {
        hash: String,
        cause: ValidationCause,
    },
    /// Fresh content was rejected and no usable fallback exists.
    Rejected { cause: ValidationCause },
}

impl TickOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Empty => "empty",
            TickOutcome::Unchanged => "unchanged",
            TickOutcome::Applied { .. } => "applied",
            TickOutcome::FallbackApplied { .. } => "fallback_applied",
            TickOutcome::Rejected { .. } => "rejected",
        }
    }
}
