use axum::{
    routing::{get, post},
    Router,
};
use sendlater_core::SendlaterConfig;
use sendlater_scheduler::JobStore;
use std::sync::Arc;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
///
/// The store handle is the only mutable resource; the scheduler engine holds
/// its own clone and the two sides never call each other directly.
pub struct AppState {
    pub config: SendlaterConfig,
    pub store: JobStore,
}

impl AppState {
    pub fn new(config: SendlaterConfig, store: JobStore) -> Self {
        Self { config, store }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/schedule", post(crate::http::schedule::schedule_handler))
        .route("/scheduled", get(crate::http::scheduled::scheduled_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}
