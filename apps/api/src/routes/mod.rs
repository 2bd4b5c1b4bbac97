pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let timeout = TimeoutLayer::new(state.config.request_timeout);

    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/semantic-match", post(handlers::handle_semantic_match))
        .route("/api/v1/aggregate", post(handlers::handle_aggregate))
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .layer(timeout)
        .with_state(state)
}
