//! clipflow-qd library - Queue Dispatch service
//!
//! Work-item assignment and handoff engine for the ClipFlow production
//! pipeline: queue listings with SLA tiers, time-boxed claims, automatic
//! dispatch, and role-gated status transitions.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod claims;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod store;
pub mod transitions;

pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Everything under /api requires bearer authentication; /health does not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let protected = Router::new()
        .route("/api/videos/queue", get(api::queue::list_queue))
        .route("/api/videos", post(api::queue::create_video))
        .route("/api/videos/my-active", get(api::dispatch::get_my_active))
        .route("/api/videos/dispatch", post(api::dispatch::dispatch_video))
        .route("/api/videos/:id", get(api::queue::get_video))
        .route("/api/videos/:id/claim", post(api::claim::claim_video))
        .route("/api/videos/:id/release", post(api::claim::release_video))
        .route("/api/videos/:id/execution", put(api::execution::submit_execution))
        .route("/api/auth/runtime-config", get(api::runtime_config::get_runtime_config))
        .route("/api/notifications", get(api::notifications::list_notifications))
        .route("/api/notifications/:id/read", post(api::notifications::mark_read))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::auth_middleware,
        ));

    let public = api::health::health_routes();

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(CorsLayer::permissive())
}
