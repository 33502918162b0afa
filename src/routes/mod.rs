//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers); tighten for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        // Mastery
        .route("/api/v1/mastery/answer", post(http::http_post_answer))
        .route("/api/v1/mastery/records", get(http::http_get_mastery))
        // Quizzes
        .route("/api/v1/quiz/adaptive", get(http::http_get_adaptive_quiz))
        .route("/api/v1/quiz/assign", post(http::http_post_assign))
        .route("/api/v1/quiz/pending", get(http::http_get_pending))
        .route("/api/v1/quiz/open", get(http::http_get_open_quiz))
        .route("/api/v1/quiz/complete", post(http::http_post_complete))
        // Teacher views
        .route("/api/v1/teacher/roster", get(http::http_get_roster))
        .route("/api/v1/teacher/progress", get(http::http_get_progress))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}
