pub mod handover;
pub mod pdu_session;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use crate::state::AppState;
use crate::types::MessageWithError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ps/handover-required", post(handover::handover_required))
        .route("/ps/n2-establishment-response", post(pdu_session::n2_establishment_response))
        .route("/sessions", post(pdu_session::create_session).delete(pdu_session::release_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug)]
pub enum AppError {
    ValidationError(MessageWithError),
    NotFound(MessageWithError),
    Conflict(MessageWithError),
    InternalError(MessageWithError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(body) => (StatusCode::BAD_REQUEST, body),
            AppError::NotFound(body) => (StatusCode::NOT_FOUND, body),
            AppError::Conflict(body) => (StatusCode::CONFLICT, body),
            AppError::InternalError(body) => (StatusCode::INTERNAL_SERVER_ERROR, body),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::error!("could not deserialize: {}", rejection.body_text());
        AppError::ValidationError(MessageWithError::new(
            "could not deserialize",
            rejection.body_text(),
        ))
    }
}
