//! Read side of the reconciler.
//!
//! The reconciler owns the active configuration and publishes an immutable
//! [`Snapshot`] after every tick. Readers load the latest snapshot without
//! locking and never observe a half-applied configuration.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::{ReconcileState, TickOutcome};
use crate::guard::mode;
use crate::settings::{ActiveConfig, ValidationBounds};

/// Everything a reader may want to know about the pipeline at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub config: ActiveConfig,
    pub bounds: ValidationBounds,
    pub state: ReconcileState,
    pub last_outcome: Option<TickOutcome>,
    /// Hash of the last applied content, empty before the first apply.
    pub applied_hash: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub ticks: u64,
}

impl Snapshot {
    pub fn initial(config: ActiveConfig, bounds: ValidationBounds) -> Self {
        Self {
            config,
            bounds,
            state: ReconcileState::Idle,
            last_outcome: None,
            applied_hash: String::new(),
            applied_at: None,
            ticks: 0,
        }
    }
}

/// Cheap, cloneable reader handle.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<Snapshot>>,
    enforce_account_mode: bool,
}

impl ConfigHandle {
    pub fn new(initial: Snapshot, enforce_account_mode: bool) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
            enforce_account_mode,
        }
    }

    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.inner.store(Arc::new(snapshot));
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Copy of the active configuration.
    pub fn active_config(&self) -> ActiveConfig {
        self.inner.load().config.clone()
    }

    /// Whether the declared account mode allows acting on this account.
    ///
    /// Always true when account-mode enforcement is disabled.
    pub fn mode_matches(&self, is_simulated: bool) -> bool {
        if !self.enforce_account_mode {
            return true;
        }
        let snapshot = self.inner.load();
        mode::mode_matches(&snapshot.config.account_mode, is_simulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_snapshot() {
        let handle = ConfigHandle::new(
            Snapshot::initial(ActiveConfig::default(), ValidationBounds::default()),
            true,
        );
        let before = handle.snapshot();

        let mut config = ActiveConfig::default();
        config.tp_ticks = 42;
        let mut next = Snapshot::initial(config, ValidationBounds::default());
        next.ticks = 1;
        handle.publish(next);

        assert_eq!(before.config.tp_ticks, 20);
        assert_eq!(handle.active_config().tp_ticks, 42);
        assert_eq!(handle.snapshot().ticks, 1);
    }

    #[test]
    fn test_mode_matches_uses_active_mode() {
        let handle = ConfigHandle::new(
            Snapshot::initial(ActiveConfig::default(), ValidationBounds::default()),
            true,
        );
        // default mode is demo
        assert!(handle.mode_matches(true));
        assert!(!handle.mode_matches(false));

        let unenforced = ConfigHandle::new(
            Snapshot::initial(ActiveConfig::default(), ValidationBounds::default()),
            false,
        );
        assert!(unenforced.mode_matches(false));
    }
}
