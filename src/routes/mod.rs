use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::ExerciseStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::RecommendationEngine,
};

pub mod completions;
pub mod exercises;
pub mod plans;
pub mod progress;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ExerciseStore>,
    pub engine: RecommendationEngine,
    /// Used when a recommendation request does not specify `count`
    pub default_recommendation_count: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ExerciseStore>,
        engine: RecommendationEngine,
        default_recommendation_count: usize,
    ) -> Self {
        Self {
            store,
            engine,
            default_recommendation_count,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exercises", get(exercises::list))
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        .route("/users/:user_id/progress", get(progress::summary))
        .route("/users/:user_id/completions", post(completions::create))
        .route("/plans/:focus_area", get(plans::weekly))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
