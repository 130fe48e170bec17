//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! router.toml
//!     → loader.rs (parse ServerConfig)
//!
//! build output (config.json)
//!     → loader.rs (parse & deserialize BuildOutput)
//!     → validation.rs (semantic checks)
//!     → routing::RouteTable (compiled, immutable)
//!     → shared via Arc<ArcSwap<RouteTable>>
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs compiles a new table
//!     → atomic swap of the Arc; in-flight requests keep the old one
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once compiled; changes require a full reload
//! - A failed reload keeps the current table
//! - All ServerConfig fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_build_output, load_route_table, load_server_config, ConfigError};
pub use schema::{BuildOutput, LambdaConfig, RouteEntryConfig, RuleConfig, ServerConfig};
