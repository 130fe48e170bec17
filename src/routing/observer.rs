//! Observability hooks invoked by the route scan.

use std::fmt::Debug;

use crate::routing::result::RouteResult;

/// Receives events from `RouteTable::route`.
///
/// All methods default to no-ops so implementors pick the events they need.
pub trait RouteObserver: Send + Sync + Debug {
    /// A pattern rule at `index` is about to be tested against `path`.
    fn rule_considered(&self, _index: usize, _source: &str, _path: &str) {}

    /// The rule at `index` matched and rewrote the path to `destination`.
    fn rule_matched(&self, _index: usize, _source: &str, _destination: &str) {}

    /// The scan finished with `result`.
    fn decided(&self, _path: &str, _result: &RouteResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RouteObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RouteObserver for TracingObserver {
    fn rule_considered(&self, index: usize, source: &str, path: &str) {
        tracing::trace!(index, source, path, "Considering rule");
    }

    fn rule_matched(&self, index: usize, source: &str, destination: &str) {
        tracing::debug!(index, source, destination, "Rule matched");
    }

    fn decided(&self, path: &str, result: &RouteResult) {
        tracing::debug!(
            path,
            found = result.found,
            target = result.target.as_str(),
            destination = %result.destination,
            matched_rule_index = ?result.matched_rule_index,
            "Routing decision"
        );
    }
}
