//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (requests, latency, not-found, route count)
//! - Expose a Prometheus-compatible scrape endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status
//! - `router_request_duration_seconds` (histogram): dispatch latency by method
//! - `router_not_found_total` (counter): unmatched requests by method
//! - `router_routes_registered` (gauge): routes in the active tree
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a request that matched no route.
pub fn record_not_found(method: &str) {
    counter!("router_not_found_total", "method" => method.to_string()).increment(1);
}

/// Publish the number of routes in the active tree.
pub fn record_routes_registered(count: usize) {
    gauge!("router_routes_registered").set(count as f64);
}
