//! Configuration schema definitions.
//!
//! Two documents are described here:
//! - [`ServerConfig`]: the router service's own settings (TOML).
//! - [`BuildOutput`]: the route table emitted by the application build (JSON).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::Phase;

/// Root configuration for the routing service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where the route table comes from.
    pub routes: RoutesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route table source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path to the build output JSON.
    pub build_output: PathBuf,

    /// Reload the table when the build output changes.
    pub watch: bool,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            build_output: PathBuf::from("config.json"),
            watch: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route configuration emitted by the application build.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    /// Ordered rule list.
    #[serde(default)]
    pub routes: Vec<RouteEntryConfig>,

    /// Compute backends keyed by function name.
    #[serde(default)]
    pub lambdas: BTreeMap<String, LambdaConfig>,

    /// Paths served from the static asset store.
    #[serde(default)]
    pub static_routes: Vec<String>,
}

impl BuildOutput {
    /// Routes served by a compute backend.
    pub fn backend_routes(&self) -> impl Iterator<Item = &str> + '_ {
        self.lambdas.values().map(|lambda| lambda.route.as_str())
    }
}

/// One compute backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LambdaConfig {
    #[serde(default)]
    pub handler: String,

    #[serde(default)]
    pub runtime: String,

    #[serde(default)]
    pub filename: String,

    /// Internal path the route table rewrites to for this backend.
    pub route: String,
}

/// One entry of the ordered route list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RouteEntryConfig {
    /// Phase boundary, e.g. `{ "handle": "filesystem" }`.
    Handler { handle: Phase },
    /// Match/rewrite rule.
    Rule(RuleConfig),
}

/// A match/rewrite rule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Pattern matched against the request path.
    pub src: String,

    /// Rewrite template; absent keeps the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,

    /// Response header templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Keep scanning after a match.
    #[serde(default, rename = "continue")]
    pub continues: bool,

    /// Only terminate when the destination is a known backend route.
    #[serde(default)]
    pub check: bool,

    /// Status reported when this rule decides the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}
