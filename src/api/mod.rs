//! REST API over the live reading store.
//!
//! Routes:
//! - `GET /api/energy/telemetry`: latest reading of every meter, sorted by id,
//!   with optional `status` and `limit` query parameters
//! - `OPTIONS /api/energy/telemetry`: CORS preflight
//! - `GET /api/energy/telemetry/{device_id}`: latest reading of one meter
//! - `GET /api/energy/summary`: fleet-wide aggregates
//! - `GET /health`: readiness probe

mod handlers;
mod types;

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

use crate::sim::scheduler::Scheduler;

pub use types::{ErrorResponse, TelemetryQuery};

/// Application state shared across all request handlers.
///
/// Holds the scheduler, which in turn owns the store handlers read from.
/// No extra locking is needed here: the store synchronises itself.
pub struct AppState {
    /// Lifecycle manager whose store backs every route.
    pub scheduler: Arc<Scheduler>,
}

impl AppState {
    /// Wraps a scheduler for use as router state.
    pub fn new(scheduler: Arc<Scheduler>) -> Arc<Self> {
        Arc::new(Self { scheduler })
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/energy/telemetry",
            get(handlers::get_telemetry).options(handlers::preflight),
        )
        .route(
            "/api/energy/telemetry/{device_id}",
            get(handlers::get_device),
        )
        .route("/api/energy/summary", get(handlers::get_summary))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves the API on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an `io::Error` if the server fails while accepting connections.
pub async fn serve(
    state: Arc<AppState>,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "API server listening");
    info!("endpoint: http://{addr}/api/energy/telemetry");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
