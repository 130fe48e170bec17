//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup / reload):
//!     BuildOutput.routes
//!     → table.rs (compile every pattern, fold header names)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path + query)
//!     → router.rs (ordered scan over rules and phase markers)
//!     → pattern.rs (match, resolve $1 / $name templates)
//!     → Return: RouteResult (found or explicit not-found)
//! ```
//!
//! # Design Decisions
//! - Rule order is significant: first terminal match wins
//! - Patterns compiled eagerly; a bad pattern rejects the whole table
//! - Routing itself never fails at request time

pub mod observer;
pub mod pattern;
pub mod result;
pub mod router;
pub mod table;

pub use observer::{NoopObserver, RouteObserver, TracingObserver};
pub use pattern::{Pattern, PatternError};
pub use result::{Destination, Phase, RouteResult, Target};
pub use table::{RouteTable, RouteTableError};
