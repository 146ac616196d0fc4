//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay calls by endpoint, status
//! - `relay_upstream_duration_seconds` (histogram): upstream exchange latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until a
//!   recorder is installed
//! - The Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must run inside the Tokio runtime. Failure is logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one relay call.
pub fn record_relay(endpoint: &'static str, status: StatusCode) {
    ::metrics::counter!(
        "relay_requests_total",
        "endpoint" => endpoint,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// Record how long an upstream exchange took, failures included.
pub fn record_upstream_duration(endpoint: &'static str, start_time: Instant) {
    ::metrics::histogram!("relay_upstream_duration_seconds", "endpoint" => endpoint)
        .record(start_time.elapsed().as_secs_f64());
}
