//! Axum router construction for the Observer API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `POST /api/init` -- initialize a new simulation
/// - `POST /api/step` -- execute one tick
/// - `GET /api/snapshot` -- current simulation state
/// - `POST /api/reset` -- rebuild from original parameters
/// - `POST /api/run-complete` -- run to completion
/// - `GET /api/health` -- liveness check
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/init", post(handlers::init))
        .route("/api/step", post(handlers::step))
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/reset", post(handlers::reset))
        .route("/api/run-complete", post(handlers::run_complete))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
