//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_reconcile_total` (counter): ticks by outcome
//! - `config_source_failures_total` (counter): degraded reads by source
//! - `config_lkg_writes_total` (counter): snapshot writes by result
//! - `config_poll_interval_seconds` (gauge): poll interval in effect
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_reconcile(outcome: &'static str) {
    counter!("config_reconcile_total", "outcome" => outcome).increment(1);
}

pub fn record_source_failure(source: &'static str) {
    counter!("config_source_failures_total", "source" => source).increment(1);
}

pub fn record_lkg_write(success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("config_lkg_writes_total", "result" => result).increment(1);
}

pub fn record_poll_interval(secs: u64) {
    gauge!("config_poll_interval_seconds").set(secs as f64);
}
