//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_decisions_total` (counter): decisions by target and found
//! - `router_decision_duration_seconds` (histogram): time spent in `route()`
//! - `router_table_reloads_total` (counter): reloads by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::{RouteObserver, RouteResult, TracingObserver};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record how long one `route()` call took.
pub fn record_decision_duration(start: Instant) {
    metrics::histogram!("router_decision_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a table reload attempt.
pub fn record_reload(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("router_table_reloads_total", "outcome" => outcome).increment(1);
}

/// Observer that counts decisions and forwards every event to `inner`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver<O = TracingObserver> {
    inner: O,
}

impl<O: RouteObserver> MetricsObserver<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<O: RouteObserver> RouteObserver for MetricsObserver<O> {
    fn rule_considered(&self, index: usize, source: &str, path: &str) {
        self.inner.rule_considered(index, source, path);
    }

    fn rule_matched(&self, index: usize, source: &str, destination: &str) {
        self.inner.rule_matched(index, source, destination);
    }

    fn decided(&self, path: &str, result: &RouteResult) {
        metrics::counter!(
            "router_decisions_total",
            "target" => result.target.as_str(),
            "found" => if result.found { "true" } else { "false" }
        )
        .increment(1);
        self.inner.decided(path, result);
    }
}
