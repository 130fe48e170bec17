//! Ordered route evaluation.
//!
//! # Responsibilities
//! - Split the raw request into path and query
//! - Walk the table in order, threading a `ScanState` through each entry
//! - Produce exactly one `RouteResult` per call
//!
//! # Design Decisions
//! - Pure function of (table, request); nothing persists between calls
//! - Never fails at request time: no match is an explicit `found = false`
//! - First terminal match wins; `continue` and rejected `check` rules only
//!   rewrite the in-flight path

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use crate::routing::pattern::resolve;
use crate::routing::result::{Destination, Phase, RouteResult, Target};
use crate::routing::table::{RouteEntry, RouteTable, Rule};

type Query = BTreeMap<String, String>;

/// Scan state carried from one entry to the next.
#[derive(Debug, Clone)]
struct ScanState {
    pathname: String,
    phase: Option<Phase>,
    status: Option<u16>,
    continued: bool,
    headers: BTreeMap<String, String>,
}

impl ScanState {
    fn new(pathname: String) -> Self {
        Self {
            pathname,
            phase: None,
            status: None,
            continued: false,
            headers: BTreeMap::new(),
        }
    }

    fn not_found(self, query: Query) -> RouteResult {
        RouteResult {
            found: false,
            destination: self.pathname,
            target: Target::Unresolved,
            headers: self.headers,
            continued: self.continued,
            status: self.status,
            query_args: query,
            matched_rule_index: None,
            phase: self.phase,
        }
    }
}

impl RouteTable {
    /// Decide where `request_path` (path plus optional query) is served from.
    pub fn route(&self, request_path: &str) -> RouteResult {
        let (pathname, query) = split_request(request_path);
        let state = ScanState::new(pathname);

        let outcome = self
            .entries
            .iter()
            .enumerate()
            .try_fold(state, |state, (index, entry)| match entry {
                RouteEntry::Handler(phase) => self.enter_phase(state, *phase, &query),
                RouteEntry::Rule(rule) => self.apply_rule(state, index, rule, &query),
            });

        let result = match outcome {
            ControlFlow::Break(result) => result,
            ControlFlow::Continue(state) => state.not_found(query),
        };

        self.observer.decided(request_path, &result);
        result
    }

    fn enter_phase(
        &self,
        mut state: ScanState,
        phase: Phase,
        query: &Query,
    ) -> ControlFlow<RouteResult, ScanState> {
        state.phase = Some(phase);

        if phase == Phase::Filesystem && self.is_static_route(&state.pathname) {
            return ControlFlow::Break(RouteResult {
                found: true,
                destination: state.pathname,
                target: Target::Filesystem,
                headers: state.headers,
                continued: false,
                status: None,
                query_args: query.clone(),
                matched_rule_index: None,
                phase: state.phase,
            });
        }

        ControlFlow::Continue(state)
    }

    fn apply_rule(
        &self,
        mut state: ScanState,
        index: usize,
        rule: &Rule,
        query: &Query,
    ) -> ControlFlow<RouteResult, ScanState> {
        self.observer
            .rule_considered(index, &rule.source, &state.pathname);

        let captures = rule
            .pattern
            .captures(&state.pathname)
            .or_else(|| rule.pattern.captures(strip_first_char(&state.pathname)));
        let Some(captures) = captures else {
            return ControlFlow::Continue(state);
        };

        let names = rule.pattern.names();
        let dest_path = match &rule.destination {
            Some(template) => {
                let resolved = resolve(template, &captures, names);
                split_destination(&resolved).to_string()
            }
            None => state.pathname.clone(),
        };

        for (name, template) in &rule.headers {
            let value = resolve(template, &captures, names);
            state.headers.insert(name.clone(), value);
        }

        self.observer.rule_matched(index, &rule.source, &dest_path);

        if rule.continues {
            if rule.status.is_some() {
                state.status = rule.status;
            }
            state.pathname = dest_path;
            state.continued = true;
            return ControlFlow::Continue(state);
        }

        if rule.check && state.phase != Some(Phase::Hit) && !self.is_backend_route(&dest_path) {
            state.pathname = dest_path;
            return ControlFlow::Continue(state);
        }

        ControlFlow::Break(self.terminal(state, index, rule, dest_path, query))
    }

    fn terminal(
        &self,
        state: ScanState,
        index: usize,
        rule: &Rule,
        dest_path: String,
        query: &Query,
    ) -> RouteResult {
        let (destination, target, query_args) = match Destination::classify(&dest_path) {
            Destination::Url(url) => (url, Target::Url, query.clone()),
            Destination::Path(path) => {
                let path = if path.starts_with('/') {
                    path
                } else {
                    format!("/{path}")
                };
                let (path, mut args) = split_request(&path);
                // Request-supplied values win over destination-provided ones.
                args.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
                let target = self.classify_path(&path);
                (path, target, args)
            }
        };

        RouteResult {
            found: true,
            destination,
            target,
            headers: state.headers,
            continued: state.continued,
            status: rule.status.or(state.status),
            query_args,
            matched_rule_index: Some(index),
            phase: state.phase,
        }
    }

    fn classify_path(&self, path: &str) -> Target {
        if self.is_backend_route(path) {
            Target::Backend
        } else if self.is_static_route(path) {
            Target::Filesystem
        } else {
            Target::Unresolved
        }
    }
}

/// Split a raw request into its path and decoded query.
///
/// Repeated query keys keep their last value. An empty path becomes `/`.
fn split_request(raw: &str) -> (String, Query) {
    let raw = raw.split('#').next().unwrap_or_default();
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw, ""),
    };

    let path = if path.is_empty() { "/" } else { path };
    let query = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    (path.to_string(), query)
}

/// The destination without any embedded query string or fragment.
fn split_destination(resolved: &str) -> &str {
    resolved
        .find(['?', '#'])
        .map_or(resolved, |end| &resolved[..end])
}

fn strip_first_char(path: &str) -> &str {
    let mut chars = path.chars();
    chars.next();
    chars.as_str()
}
