//! Poll loop.
//!
//! The first tick runs immediately. Each following tick starts
//! `poll_seconds` after the previous attempt started, whatever its outcome.
//! A reload trigger cuts the wait short, and triggers queued meanwhile are
//! folded into that one tick. Shutdown ends the loop.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant};

use super::reconciler::Reconciler;
use crate::lifecycle::ShutdownReason;

/// Why a tick was requested ahead of schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// The local override file changed on disk.
    LocalFileChanged,
    /// SIGHUP or an operator request.
    Signal,
}

/// Wait used when `started + interval` is not representable.
const MAX_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn next_deadline(started: Instant, interval: Duration) -> Instant {
    started
        .checked_add(interval)
        .or_else(|| started.checked_add(MAX_WAIT))
        .unwrap_or(started)
}

/// Drive `reconciler` until shutdown, returning it afterwards.
pub async fn run(
    mut reconciler: Reconciler,
    mut triggers: mpsc::UnboundedReceiver<ReloadTrigger>,
    mut shutdown: broadcast::Receiver<ShutdownReason>,
) -> Reconciler {
    tracing::info!(
        poll_secs = reconciler.poll_interval().as_secs(),
        "Config reconciler starting"
    );

    loop {
        let started = Instant::now();
        let outcome = reconciler.reconcile().await;
        tracing::debug!(outcome = outcome.label(), "Reconcile tick finished");

        let next = next_deadline(started, reconciler.poll_interval());
        tokio::select! {
            _ = time::sleep_until(next) => {}
            Some(trigger) = triggers.recv() => {
                tracing::info!(?trigger, "Early reconcile requested");
            }
            reason = shutdown.recv() => {
                tracing::info!(reason = ?reason.ok(), "Config reconciler received shutdown signal, exiting loop");
                break;
            }
        }

        let mut coalesced = 0usize;
        while triggers.try_recv().is_ok() {
            coalesced += 1;
        }
        if coalesced > 0 {
            tracing::debug!(coalesced, "Dropped queued reload triggers");
        }
    }

    reconciler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::lifecycle::Shutdown;

    #[tokio::test]
    async fn test_ticks_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.config");
        std::fs::write(&local, "poll_seconds=1\nema_fast=11").unwrap();

        let mut config = PipelineConfig::default();
        config.sources.local_path = Some(local);
        config.lkg.path = Some(dir.path().join("lkg.config"));
        let reconciler = Reconciler::new(&config);
        let handle = reconciler.handle();

        let shutdown = Shutdown::new();
        let (_tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(reconciler, rx, shutdown.subscribe()));

        time::sleep(Duration::from_millis(1500)).await;
        shutdown.trigger(ShutdownReason::Requested);
        let reconciler = task.await.unwrap();

        assert_eq!(reconciler.active().ema_fast, 11);
        assert!(handle.snapshot().ticks >= 2);
    }

    #[tokio::test]
    async fn test_trigger_runs_early_tick() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.config");
        std::fs::write(&local, "poll_seconds=3600\nquantity=2").unwrap();

        let mut config = PipelineConfig::default();
        config.sources.local_path = Some(local.clone());
        config.lkg.path = Some(dir.path().join("lkg.config"));
        let reconciler = Reconciler::new(&config);
        let handle = reconciler.handle();

        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(reconciler, rx, shutdown.subscribe()));

        for _ in 0..50 {
            if handle.snapshot().ticks >= 1 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(handle.active_config().quantity, 2);

        std::fs::write(&local, "poll_seconds=3600\nquantity=4").unwrap();
        tx.send(ReloadTrigger::LocalFileChanged).unwrap();

        for _ in 0..50 {
            if handle.snapshot().ticks >= 2 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(handle.active_config().quantity, 4);

        shutdown.trigger(ShutdownReason::Requested);
        task.await.unwrap();
    }

    #[test]
    fn test_next_deadline_never_overflows() {
        let now = Instant::now();
        assert_eq!(
            next_deadline(now, Duration::from_secs(5)),
            now + Duration::from_secs(5)
        );
        assert!(next_deadline(now, Duration::MAX) > now);
        assert!(next_deadline(now, Duration::from_secs(u64::MAX)) > now);
    }

    #[tokio::test]
    async fn test_huge_poll_interval_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.config");
        std::fs::write(&local, "poll_seconds=2147483647\nema_fast=9").unwrap();

        let mut config = PipelineConfig::default();
        config.sources.local_path = Some(local.clone());
        config.lkg.path = Some(dir.path().join("lkg.config"));
        let reconciler = Reconciler::new(&config);
        let handle = reconciler.handle();

        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(reconciler, rx, shutdown.subscribe()));

        for _ in 0..50 {
            if handle.snapshot().ticks >= 1 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(handle.active_config().poll_seconds, i32::MAX as u64);

        // The loop is still alive and answers triggers.
        std::fs::write(&local, "poll_seconds=2147483647\nema_fast=7").unwrap();
        tx.send(ReloadTrigger::Signal).unwrap();
        for _ in 0..50 {
            if handle.snapshot().ticks >= 2 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(handle.active_config().ema_fast, 7);

        shutdown.trigger(ShutdownReason::Requested);
        assert!(task.await.is_ok());
    }

    #[tokio::test]
    async fn test_burst_of_triggers_runs_one_tick() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.config");
        std::fs::write(&local, "poll_seconds=3600\nquantity=2").unwrap();

        let mut config = PipelineConfig::default();
        config.sources.local_path = Some(local);
        config.lkg.path = Some(dir.path().join("lkg.config"));
        let reconciler = Reconciler::new(&config);
        let handle = reconciler.handle();

        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(reconciler, rx, shutdown.subscribe()));

        for _ in 0..50 {
            if handle.snapshot().ticks >= 1 {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(handle.snapshot().ticks, 1);

        for _ in 0..5 {
            tx.send(ReloadTrigger::LocalFileChanged).unwrap();
        }
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.snapshot().ticks, 2);

        shutdown.trigger(ShutdownReason::Requested);
        task.await.unwrap();
    }
}
