pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route("/api/v1/score", post(handlers::handle_score))
        .route("/api/v1/jd/extract", post(handlers::handle_extract_jd))
        .route(
            "/api/v1/analytics/sentiment",
            post(handlers::handle_sentiment_distribution),
        )
        .route(
            "/api/v1/analytics/sentiment/labels",
            post(handlers::handle_application_sentiments),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
