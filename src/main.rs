//! Trade template configuration daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   remote URL ──┐
//!                ├─▶ source ─▶ kv::merge ─▶ kv::content_hash ─▶ settings::validate
//!   local file ──┘                                                    │
//!        ▲                                              ok ───────────┼──── fail
//!        │                                              ▼                   ▼
//!   config::watcher                           apply + persist LKG     load LKG, validate
//!        │                                              │                   │
//!        ▼                                              ▼                   ▼
//!   ReloadTrigger ─▶ reconcile::scheduler ─▶ ConfigHandle (ArcSwap<Snapshot>)
//!                                                       │
//!                                     admin API ◀───────┴───────▶ guard (mode, filters)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use trade_template::admin::{self, AdminState};
use trade_template::config::{load_config, LocalFileWatcher};
use trade_template::lifecycle::{signals, Shutdown};
use trade_template::observability::{logging, metrics};
use trade_template::reconcile::scheduler;
use trade_template::Reconciler;

#[derive(Parser)]
#[command(name = "trade-template")]
#[command(about = "Live-updatable trading configuration daemon", long_about = None)]
struct Args {
    /// Bootstrap configuration file (TOML)
    #[arg(short, long, default_value = "trade-template.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "trade-template starting"
    );
    tracing::info!(
        remote_url = %config.sources.remote_url,
        local_path = ?config.sources.local_path,
        poll_seconds = config.defaults.poll_seconds,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let scheduler_shutdown = shutdown.subscribe();
    let admin_shutdown = shutdown.subscribe();
    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

    let reconciler = Reconciler::new(&config);
    let handle = reconciler.handle();

    // Dropping the watcher stops it, so it lives until main returns.
    let _watcher = match (&config.sources.local_path, config.watch.enabled) {
        (Some(path), true) => match LocalFileWatcher::new(path, trigger_tx.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Local file watcher unavailable, polling only");
                None
            }
        },
        _ => None,
    };

    tokio::spawn(signals::listen(shutdown.clone(), trigger_tx));

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(handle.clone(), &config.admin.api_key);
        Some(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        }))
    } else {
        None
    };

    let reconciler = scheduler::run(reconciler, trigger_rx, scheduler_shutdown).await;

    if let Some(task) = admin_task {
        let _ = task.await;
    }

    tracing::info!(
        ticks = handle.snapshot().ticks,
        applied_hash = %reconciler.applied_hash(),
        "Shutdown complete"
    );
    Ok(())
}
