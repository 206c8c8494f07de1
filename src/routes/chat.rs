use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse},
    state::SharedState,
};

/// POST /chat
///
/// Business failures never change the status: the caller always gets 200
/// and a non-empty `reply`. Only an unparseable body is rejected.
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let lang = request.lang();

    let span = info_span!("chat", request_id = %Uuid::new_v4(), lang = lang.code());
    async move {
        debug!(message = %request.message, "chat request received");
        let outcome = state.bot.reply(&request).await;
        Ok(Json(ChatResponse {
            reply: outcome.into_reply(lang),
        }))
    }
    .instrument(span)
    .await
}

/// GET /healthz, no dependency checks.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
