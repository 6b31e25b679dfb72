//! Shutdown coordination.

use std::fmt;

use tokio::sync::broadcast;

/// Why the process is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Stopped from code, e.g. by an embedding host or a test.
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminate => "terminate",
            ShutdownReason::Requested => "requested",
        })
    }
}

/// Coordinator for graceful shutdown.
///
/// The reconciler loop and the admin API each hold a receiver; the signal
/// listener (or the host) holds a clone and triggers it once.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber. Subscribers created afterwards see
    /// nothing, so subscribe before spawning anything that may trigger.
    pub fn trigger(&self, reason: ShutdownReason) {
        tracing::info!(%reason, subscribers = self.tx.receiver_count(), "Shutdown triggered");
        let _ = self.tx.send(reason);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
