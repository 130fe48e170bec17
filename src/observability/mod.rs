//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTable::route
//!     → RouteObserver hooks (rule considered / matched / decided)
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (decision counters, latency histogram)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Routing code never logs directly; it only calls its injected observer
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use self::logging::init_logging;
pub use self::metrics::{init_metrics, MetricsObserver};
