// src/routes/mod.rs
pub mod chat;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{chat_handler, health_handler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    // Any origin, method, header and credentials. Restrict to
    // https://planville.de before exposing this publicly.
    let cors = CorsLayer::very_permissive();

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/healthz", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
