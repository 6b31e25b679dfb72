//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT / SIGTERM trigger graceful shutdown
//! - SIGHUP requests an immediate reconcile, not shutdown

use tokio::sync::mpsc;

use super::{Shutdown, ShutdownReason};
use crate::reconcile::ReloadTrigger;

/// Listen for OS signals until a shutdown signal arrives, then trigger
/// `shutdown`.
#[cfg(unix)]
pub async fn listen(shutdown: Shutdown, reload_tx: mpsc::UnboundedSender<ReloadTrigger>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())
        .map_err(|e| tracing::error!(error = %e, "Failed to install SIGTERM handler"))
        .ok();
    let mut hup = signal(SignalKind::hangup())
        .map_err(|e| tracing::error!(error = %e, "Failed to install SIGHUP handler"))
        .ok();

    let reason = loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
                tracing::info!("Interrupt received");
                break ShutdownReason::Interrupt;
            }
            Some(_) = recv(&mut term) => {
                tracing::info!("SIGTERM received");
                break ShutdownReason::Terminate;
            }
            Some(_) = recv(&mut hup) => {
                tracing::info!("SIGHUP received, requesting reconcile");
                let _ = reload_tx.send(ReloadTrigger::Signal);
            }
        }
    };

    shutdown.trigger(reason);
}

#[cfg(unix)]
async fn recv(stream: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match stream {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}

/// Listen for Ctrl+C, then trigger `shutdown`.
#[cfg(not(unix))]
pub async fn listen(shutdown: Shutdown, _reload_tx: mpsc::UnboundedSender<ReloadTrigger>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Interrupt received");
    shutdown.trigger(ShutdownReason::Interrupt);
}
