//! Fetch → merge → hash → validate → apply-or-fallback → persist.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::handle::{ConfigHandle, Snapshot};
use super::state::{ReconcileState, TickOutcome};
use crate::config::PipelineConfig;
use crate::kv::{content_hash, merge, KeyValueConfig};
use crate::observability::metrics;
use crate::settings::active::unrecognized_keys;
use crate::settings::{validate, ActiveConfig, LkgStore, ValidationBounds, ValidationCause};
use crate::source::SourceReader;

/// Owns the active configuration and drives one reconcile tick at a time.
///
/// `reconcile` takes `&mut self`, so ticks cannot overlap.
pub struct Reconciler {
    sources: SourceReader,
    remote_url: String,
    local_path: Option<PathBuf>,
    lkg: LkgStore,
    active: ActiveConfig,
    bounds: ValidationBounds,
    applied_hash: String,
    applied_at: Option<DateTime<Utc>>,
    state: ReconcileState,
    last_outcome: Option<TickOutcome>,
    ticks: u64,
    handle: ConfigHandle,
}

impl Reconciler {
    /// Create a reconciler seeded from the bootstrap configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        let sources = SourceReader::new(Duration::from_secs(config.fetch.timeout_secs.max(1)));
        let active = config.defaults.clone();
        let bounds = config.bounds;
        let handle = ConfigHandle::new(
            Snapshot::initial(active.clone(), bounds),
            config.guard.enforce_account_mode,
        );

        Self {
            sources,
            remote_url: config.sources.remote_url.clone(),
            local_path: config.sources.local_path.clone(),
            lkg: LkgStore::new(config.lkg.path.clone()),
            active,
            bounds,
            applied_hash: String::new(),
            applied_at: None,
            state: ReconcileState::Idle,
            last_outcome: None,
            ticks: 0,
            handle,
        }
    }

    /// Reader handle for collaborators.
    pub fn handle(&self) -> ConfigHandle {
        self.handle.clone()
    }

    pub fn active(&self) -> &ActiveConfig {
        &self.active
    }

    pub fn bounds(&self) -> &ValidationBounds {
        &self.bounds
    }

    pub fn applied_hash(&self) -> &str {
        &self.applied_hash
    }

    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// Where the next last-known-good snapshot is read from and written to.
    pub fn lkg_path(&self) -> PathBuf {
        self.lkg.resolve(self.active.lkg_path.as_deref()).to_path_buf()
    }

    /// Delay between poll attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.active.poll_seconds.max(1))
    }

    /// Run one tick. Never fails: sources degrade to empty and a rejected
    /// payload leaves the active configuration untouched.
    pub async fn reconcile(&mut self) -> TickOutcome {
        self.state = ReconcileState::Fetching;
        let remote = self.sources.fetch_remote(&self.remote_url).await;
        let local = self.sources.fetch_local(self.local_path.as_deref()).await;
        let merged = merge(&remote, &local);

        let outcome = self.settle(merged).await;

        self.ticks += 1;
        self.last_outcome = Some(outcome.clone());
        metrics::record_reconcile(outcome.label());
        self.publish();
        outcome
    }

    async fn settle(&mut self, merged: KeyValueConfig) -> TickOutcome {
        if merged.is_empty() {
            tracing::debug!("No configuration content from any source");
            self.state = ReconcileState::Idle;
            return TickOutcome::Empty;
        }

        let hash = content_hash(&merged);
        if hash == self.applied_hash {
            self.state = ReconcileState::Idle;
            return TickOutcome::Unchanged;
        }

        self.state = ReconcileState::Validating;
        match validate(&merged, &self.active, &self.bounds) {
            Ok(()) => {
                self.apply(&merged, hash.clone());
                let path = self.lkg_path();
                self.lkg.save(&merged, &path).await;

                tracing::info!(
                    version = %self.active.config_version,
                    updated_at = %self.active.updated_at,
                    account_mode = %self.active.account_mode,
                    "Config applied"
                );
                let ignored = unrecognized_keys(&merged);
                if !ignored.is_empty() {
                    tracing::debug!(keys = ?ignored, "Ignoring unrecognized keys");
                }
                self.state = ReconcileState::Applied;
                TickOutcome::Applied { hash }
            }
            Err(report) => {
                tracing::warn!(
                    cause = %report.cause,
                    details = %report,
                    "Config validation failed, attempting last-known-good fallback"
                );
                self.fall_back(report.cause).await
            }
        }
    }

    async fn fall_back(&mut self, cause: ValidationCause) -> TickOutcome {
        let path = self.lkg_path();
        let lkg = self.lkg.load(&path).await;

        if !lkg.is_empty() {
            match validate(&lkg, &self.active, &self.bounds) {
                Ok(()) => {
                    let hash = content_hash(&lkg);
                    self.apply(&lkg, hash.clone());
                    tracing::info!(
                        path = %path.display(),
                        version = %self.active.config_version,
                        "Recovered using last-known-good"
                    );
                    self.state = ReconcileState::FallbackApplied;
                    return TickOutcome::FallbackApplied { hash, cause };
                }
                Err(report) => {
                    tracing::warn!(details = %report, "Last-known-good failed validation");
                }
            }
        }

        tracing::warn!("No valid fallback found, keeping previous in-memory settings");
        self.state = ReconcileState::Rejected;
        TickOutcome::Rejected { cause }
    }

    /// Only reached with a mapping that passed validation.
    fn apply(&mut self, kv: &KeyValueConfig, hash: String) {
        self.active = self.active.applied_from(kv);
        self.bounds = self.bounds.updated_from(kv);
        self.applied_hash = hash;
        self.applied_at = Some(Utc::now());
        metrics::record_poll_interval(self.active.poll_seconds);
    }

    fn publish(&self) {
        self.handle.publish(Snapshot {
            config: self.active.clone(),
            bounds: self.bounds,
            state: self.state,
            last_outcome: self.last_outcome.clone(),
            applied_hash: self.applied_hash.clone(),
            applied_at: self.applied_at,
            ticks: self.ticks,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        reconciler: Reconciler,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut config = PipelineConfig::default();
            config.sources.local_path = Some(dir.path().join("local.config"));
            config.lkg.path = Some(dir.path().join("lkg.config"));
            let reconciler = Reconciler::new(&config);
            Self { dir, reconciler }
        }

        fn write_local(&self, text: &str) {
            std::fs::write(self.dir.path().join("local.config"), text).unwrap();
        }

        fn write_lkg(&self, text: &str) {
            std::fs::write(self.lkg(), text).unwrap();
        }

        fn lkg(&self) -> PathBuf {
            self.dir.path().join("lkg.config")
        }
    }

    #[tokio::test]
    async fn test_apply_and_persist() {
        let mut f = Fixture::new();
        f.write_local("ema_fast=12\ntp_ticks=25\nconfig_version=7");

        let outcome = f.reconciler.reconcile().await;
        assert!(matches!(outcome, TickOutcome::Applied { .. }));
        assert_eq!(f.reconciler.state(), ReconcileState::Applied);
        assert_eq!(f.reconciler.active().ema_fast, 12);
        assert_eq!(f.reconciler.active().tp_ticks, 25);
        assert_eq!(f.reconciler.active().config_version, "7");
        assert_eq!(f.reconciler.applied_hash().len(), 64);

        let saved = crate::kv::parse_kv(&std::fs::read_to_string(f.lkg()).unwrap());
        assert_eq!(saved.get("tp_ticks"), Some("25"));
    }

    #[tokio::test]
    async fn test_identical_content_is_noop() {
        let mut f = Fixture::new();
        f.write_local("ema_fast=12");

        f.reconciler.reconcile().await;
        let hash = f.reconciler.applied_hash().to_string();
        std::fs::remove_file(f.lkg()).unwrap();

        let outcome = f.reconciler.reconcile().await;
        assert_eq!(outcome, TickOutcome::Unchanged);
        assert_eq!(f.reconciler.state(), ReconcileState::Idle);
        assert_eq!(f.reconciler.applied_hash(), hash);
        // no second LKG write
        assert!(!f.lkg().exists());
    }

    #[tokio::test]
    async fn test_empty_sources_do_nothing() {
        let mut f = Fixture::new();
        let before = f.reconciler.active().clone();

        let outcome = f.reconciler.reconcile().await;
        assert_eq!(outcome, TickOutcome::Empty);
        assert_eq!(f.reconciler.active(), &before);
        assert!(f.reconciler.applied_hash().is_empty());
        assert!(!f.lkg().exists());
    }

    #[tokio::test]
    async fn test_fallback_to_lkg() {
        let mut f = Fixture::new();
        f.write_lkg("ema_fast=7\ntp_ticks=30\nsl_ticks=12");
        f.write_local("tp_ticks=0");

        let outcome = f.reconciler.reconcile().await;
        match outcome {
            TickOutcome::FallbackApplied { hash, cause } => {
                assert_eq!(cause, ValidationCause::ZeroDistance);
                assert_eq!(hash, f.reconciler.applied_hash());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(f.reconciler.state(), ReconcileState::FallbackApplied);
        assert_eq!(f.reconciler.active().ema_fast, 7);
        assert_eq!(f.reconciler.active().tp_ticks, 30);
        assert_eq!(f.reconciler.active().sl_ticks, 12);
    }

    #[tokio::test]
    async fn test_rejected_without_lkg_keeps_config() {
        let mut f = Fixture::new();
        f.write_local("ema_fast=12");
        f.reconciler.reconcile().await;
        std::fs::remove_file(f.lkg()).unwrap();

        let before = f.reconciler.active().clone();
        let bounds = *f.reconciler.bounds();
        let hash = f.reconciler.applied_hash().to_string();

        f.write_local("ema_fast=12\nquantity=500\nmax_quantity=1000");
        let outcome = f.reconciler.reconcile().await;
        assert_eq!(
            outcome,
            TickOutcome::Rejected {
                cause: ValidationCause::OutOfRange
            }
        );
        assert_eq!(f.reconciler.active(), &before);
        assert_eq!(f.reconciler.bounds(), &bounds);
        assert_eq!(f.reconciler.applied_hash(), hash);

        // same bad content is validated and rejected again, not suppressed
        let outcome = f.reconciler.reconcile().await;
        assert!(matches!(outcome, TickOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_invalid_lkg_is_not_applied() {
        let mut f = Fixture::new();
        f.write_lkg("quantity=999");
        f.write_local("sl_ticks=0");
        let before = f.reconciler.active().clone();

        let outcome = f.reconciler.reconcile().await;
        assert!(matches!(outcome, TickOutcome::Rejected { .. }));
        assert_eq!(f.reconciler.active(), &before);
    }

    #[tokio::test]
    async fn test_bounds_take_effect_after_apply() {
        let mut f = Fixture::new();
        f.write_local("max_ticks=300\ntp_ticks=250");
        assert!(matches!(
            f.reconciler.reconcile().await,
            TickOutcome::Rejected { .. }
        ));

        f.write_local("max_ticks=300");
        assert!(matches!(
            f.reconciler.reconcile().await,
            TickOutcome::Applied { .. }
        ));
        assert_eq!(f.reconciler.bounds().max_ticks, 300);

        f.write_local("max_ticks=300\ntp_ticks=250");
        assert!(matches!(
            f.reconciler.reconcile().await,
            TickOutcome::Applied { .. }
        ));
        assert_eq!(f.reconciler.active().tp_ticks, 250);
    }

    #[tokio::test]
    async fn test_lkg_path_override_is_used() {
        let mut f = Fixture::new();
        let custom = f.dir.path().join("custom").join("lkg.config");
        f.write_local(&format!("lkg_path={}\nquantity=3", custom.display()));

        f.reconciler.reconcile().await;
        assert_eq!(f.reconciler.lkg_path(), custom);
        assert!(custom.exists());
        assert!(!f.lkg().exists());
    }

    #[tokio::test]
    async fn test_poll_interval_follows_config() {
        let mut f = Fixture::new();
        assert_eq!(f.reconciler.poll_interval(), Duration::from_secs(5));
        f.write_local("poll_seconds=0");
        f.reconciler.reconcile().await;
        assert_eq!(f.reconciler.poll_interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_snapshot_published() {
        let mut f = Fixture::new();
        let handle = f.reconciler.handle();
        f.write_local("ema_mid=60\naccount_mode=live");

        f.reconciler.reconcile().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.config.ema_mid, 60);
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.state, ReconcileState::Applied);
        assert!(snapshot.applied_at.is_some());
        assert!(handle.mode_matches(false));
        assert!(!handle.mode_matches(true));
    }
}
