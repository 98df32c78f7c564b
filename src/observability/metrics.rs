//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_probes_total` (counter): health probes by outcome (success, failure, timeout)
//! - `monitor_refresh_failures_total` (counter): scheduled refreshes that returned an error
//! - `monitor_poll_level` (gauge): current poll level per cluster
//! - `monitor_cluster_status` (gauge): 0=unknown, 1=ok, 2=warning, 3=error per cluster

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::domain::ClusterStatus;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(outcome: &'static str) {
    counter!("monitor_probes_total", "outcome" => outcome).increment(1);
}

pub fn record_refresh_failure() {
    counter!("monitor_refresh_failures_total").increment(1);
}

pub fn record_poll_level(cluster_id: &str, level: u8) {
    gauge!("monitor_poll_level", "cluster" => cluster_id.to_string()).set(f64::from(level));
}

pub fn record_cluster_status(cluster_id: &str, status: ClusterStatus) {
    gauge!("monitor_cluster_status", "cluster" => cluster_id.to_string()).set(status.as_gauge());
}
