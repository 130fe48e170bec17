//! Compiled, immutable route table.
//!
//! # Responsibilities
//! - Compile every rule pattern up front
//! - Hold the backend-route and static-route sets
//! - Reject the whole table on the first malformed rule
//!
//! # Design Decisions
//! - Immutable after construction; share via `Arc` and replace wholesale
//! - Header names are case-folded once here rather than per request

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{BuildOutput, RouteEntryConfig, RuleConfig};
use crate::routing::observer::{NoopObserver, RouteObserver};
use crate::routing::pattern::{Pattern, PatternError};
use crate::routing::result::Phase;

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteTableError {
    /// A rule's `src` is not a valid expression.
    #[error("route {index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    /// A rule carries a status outside the HTTP range.
    #[error("route {index}: {status} is not a valid HTTP status")]
    InvalidStatus { index: usize, status: u16 },
}

/// A compiled table entry.
#[derive(Debug, Clone)]
pub(crate) enum RouteEntry {
    Handler(Phase),
    Rule(Rule),
}

/// A compiled match/rewrite rule.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub source: String,
    pub pattern: Pattern,
    pub destination: Option<String>,
    /// Lowercased header name and value template.
    pub headers: Vec<(String, String)>,
    pub continues: bool,
    pub check: bool,
    pub status: Option<u16>,
}

impl Rule {
    fn compile(index: usize, config: RuleConfig) -> Result<Self, RouteTableError> {
        let pattern = Pattern::compile(&config.src)
            .map_err(|source| RouteTableError::Pattern { index, source })?;

        if let Some(status) = config.status {
            if !(100..=599).contains(&status) {
                return Err(RouteTableError::InvalidStatus { index, status });
            }
        }

        let headers = config
            .headers
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();

        Ok(Self {
            source: config.src,
            pattern,
            destination: config.dest,
            headers,
            continues: config.continues,
            check: config.check,
            status: config.status,
        })
    }
}

/// Ordered rules plus the known backend and static routes.
#[derive(Clone)]
pub struct RouteTable {
    pub(crate) entries: Vec<RouteEntry>,
    backend_routes: HashSet<String>,
    static_routes: HashSet<String>,
    pub(crate) observer: Arc<dyn RouteObserver>,
}

impl RouteTable {
    /// Compile a route table. Fails on the first malformed rule.
    pub fn new<B, S>(
        entries: Vec<RouteEntryConfig>,
        backend_routes: B,
        static_routes: S,
    ) -> Result<Self, RouteTableError>
    where
        B: IntoIterator,
        B::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                RouteEntryConfig::Handler { handle } => Ok(RouteEntry::Handler(handle)),
                RouteEntryConfig::Rule(rule) => Rule::compile(index, rule).map(RouteEntry::Rule),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            entries,
            backend_routes: backend_routes.into_iter().map(Into::into).collect(),
            static_routes: static_routes.into_iter().map(Into::into).collect(),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Compile the table described by a build output.
    pub fn from_build_output(output: &BuildOutput) -> Result<Self, RouteTableError> {
        Self::new(
            output.routes.clone(),
            output.backend_routes(),
            output.static_routes.iter().map(String::as_str),
        )
    }

    /// Attach an observer notified during every `route()` call.
    pub fn with_observer(mut self, observer: Arc<dyn RouteObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Number of entries, handler markers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_backend_route(&self, path: &str) -> bool {
        self.backend_routes.contains(path)
    }

    pub fn is_static_route(&self, path: &str) -> bool {
        self.static_routes.contains(path)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("entries", &self.entries.len())
            .field("backend_routes", &self.backend_routes.len())
            .field("static_routes", &self.static_routes.len())
            .finish()
    }
}
