//! Edge routing engine for statically-hosted web applications.
//!
//! Decides, per request path, whether a response comes from the static asset
//! store, a compute backend, or an external redirect.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteResult, RouteTable, Target};
