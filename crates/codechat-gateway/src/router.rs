//! Route table and request-level middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers;
use crate::server::AppState;

#[must_use]
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    Router::new()
        .route("/initialize-bard-qna", post(handlers::initialize))
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
