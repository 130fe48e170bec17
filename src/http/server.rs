//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the decision handlers
//! - Wire up middleware (tracing, timeout)
//! - Hold the current route table and swap it on reload
//! - Serve until the shutdown coordinator fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    response::Response,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::response::decision_response;
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{record_decision_duration, record_reload};
use crate::routing::{RouteResult, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ArcSwap<RouteTable>>,
}

impl AppState {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table: Arc::new(ArcSwap::new(table)),
        }
    }

    /// Route against whichever table is current.
    pub fn route(&self, request_path: &str) -> RouteResult {
        let start = Instant::now();
        let result = self.table.load().route(request_path);
        record_decision_duration(start);
        result
    }
}

/// HTTP server exposing routing decisions.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving `table`.
    pub fn new(config: &ServerConfig, table: Arc<RouteTable>) -> Self {
        let state = AppState::new(table);
        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/_routing/resolve", get(resolve_handler))
            .route("/_routing/health", get(health_handler))
            .route("/{*path}", any(decision_handler))
            .route("/", any(decision_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared handle to the current route table.
    pub fn table_handle(&self) -> Arc<ArcSwap<RouteTable>> {
        self.state.table.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Tables received on `table_updates` replace the current one atomically.
    pub async fn run(
        self,
        listener: TcpListener,
        mut table_updates: mpsc::UnboundedReceiver<Arc<RouteTable>>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let table = self.state.table.clone();
        let reload_shutdown = shutdown.signal();
        tokio::spawn(async move {
            tokio::pin!(reload_shutdown);
            loop {
                tokio::select! {
                    update = table_updates.recv() => match update {
                        Some(new_table) => {
                            tracing::info!(entries = new_table.len(), "Route table swapped");
                            table.store(new_table);
                            record_reload(true);
                        }
                        None => break,
                    },
                    _ = &mut reload_shutdown => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ResolveParams {
    path: String,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    rules: usize,
}

/// Return the decision for `?path=` as JSON without applying it.
async fn resolve_handler(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Json<RouteResult> {
    Json(state.route(&params.path))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        rules: state.table.load().len(),
    })
}

/// Route the request and answer with the applied decision.
async fn decision_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let result = state.route(path);

    if !result.found {
        tracing::debug!(path = %path, "No route matched");
    }

    decision_response(result)
}
