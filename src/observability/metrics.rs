//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mux_requests_total` (counter): dispatched requests by method, status, route
//! - `mux_request_duration_seconds` (histogram): latency by method, route
//! - `mux_route_table_size` (gauge): registered patterns in the active table
//! - `mux_config_reloads_total` (counter): reload attempts by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    ::metrics::counter!(
        "mux_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "mux_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the number of patterns in the active route table.
pub fn record_route_table_size(size: usize) {
    ::metrics::gauge!("mux_route_table_size").set(size as f64);
}

/// Record a configuration reload attempt ("applied" or "rejected").
pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("mux_config_reloads_total", "outcome" => outcome).increment(1);
}
