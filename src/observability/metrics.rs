//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cms_redirects_total` (counter): redirect decisions by action
//! - `cms_page_loads_total` (counter): page lookups by mode (display, editor)
//! - `cms_reported_errors_total` (counter): recoverable errors by kind
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a redirect table decision.
pub fn record_redirect(action: &'static str) {
    metrics::counter!("cms_redirects_total", "action" => action).increment(1);
}

/// Count a page lookup.
pub fn record_page_load(mode: &'static str) {
    metrics::counter!("cms_page_loads_total", "mode" => mode).increment(1);
}

/// Count a reported error.
pub fn record_error(kind: &'static str) {
    metrics::counter!("cms_reported_errors_total", "kind" => kind).increment(1);
}
