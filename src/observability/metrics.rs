//! Metrics collection and exposition.
//!
//! # Metrics
//! - `origin_scrutiny_requests_total` (counter): requests by outcome
//!   (`excluded`, `forwarded`, `rejected`)
//! - `origin_scrutiny_rejections_total` (counter): rejections by reason
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::scrutiny::Violation;

pub const REQUESTS_TOTAL: &str = "origin_scrutiny_requests_total";
pub const REJECTIONS_TOTAL: &str = "origin_scrutiny_rejections_total";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_excluded() {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => "excluded").increment(1);
}

pub fn record_forwarded() {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => "forwarded").increment(1);
}

pub fn record_rejected(violation: Violation) {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => "rejected").increment(1);
    metrics::counter!(REJECTIONS_TOTAL, "reason" => violation.kind()).increment(1);
}
