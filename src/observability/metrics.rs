//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_backend_errors_total` (counter): failed backend calls by kind
//! - `gateway_event_frames_total` (counter): frames written by topic
//! - `gateway_event_streams_active` (gauge): open client event streams
//!
//! Recording is a no-op until a recorder is installed, so these helpers are
//! safe to call from tests.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_error(kind: &'static str) {
    counter!("gateway_backend_errors_total", "kind" => kind).increment(1);
}

pub fn record_event_frame(topic: &'static str) {
    counter!("gateway_event_frames_total", "topic" => topic).increment(1);
}

pub fn stream_opened() {
    gauge!("gateway_event_streams_active").increment(1.0);
}

pub fn stream_closed() {
    gauge!("gateway_event_streams_active").decrement(1.0);
}
