//! HTTP surface of the router.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, timeout)
//!     → RouteTable::route (current table, loaded from ArcSwap)
//!     → response.rs (status, Location, decision headers)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
