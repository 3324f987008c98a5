use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use crate::handlers::AppError;
use crate::state::AppState;
use crate::types::{HandoverRequired, Message};

/// Acknowledges Handover Required as soon as it parses; the handover itself runs in the background.
pub async fn handover_required(
    State(state): State<AppState>,
    payload: Result<Json<HandoverRequired>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let Json(msg) = payload?;

    tracing::info!(
        ue = %msg.ue,
        gnb_source = %msg.source_gnb,
        gnb_target = %msg.target_gnb,
        "New Handover Required"
    );

    state.handover.accept(msg);

    Ok((
        StatusCode::ACCEPTED,
        Json(Message::new("please refer to logs for more information")),
    ))
}
