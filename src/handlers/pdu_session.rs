use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use url::Url;
use crate::handlers::AppError;
use crate::models::PduSession;
use crate::services::session_directory::DirectoryError;
use crate::state::AppState;
use crate::types::{Message, MessageWithError, N2PduSessionRespMsg};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionKey {
    pub ue: Url,
    pub addr: IpAddr,
    pub dnn: String,
}

pub async fn n2_establishment_response(
    State(state): State<AppState>,
    payload: Result<Json<N2PduSessionRespMsg>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Json(msg) = payload?;

    state
        .establishment
        .record(&state.lifecycle, &msg)
        .await
        .map_err(|e| {
            AppError::InternalError(MessageWithError::new("could not create downlink path", e))
        })?;

    Ok(Json(Message::new("downlink path created")))
}

pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<SessionKey>, JsonRejection>,
) -> Result<(StatusCode, Json<PduSession>), AppError> {
    let Json(key) = payload?;

    let session = state
        .sessions
        .create_session_uplink(&state.lifecycle, &key.ue, key.addr, &key.dnn)
        .await
        .map_err(|e| match e {
            DirectoryError::SessionExists { .. } => {
                AppError::Conflict(MessageWithError::new("PDU session already exists", e))
            }
            _ => AppError::InternalError(MessageWithError::new("could not create uplink path", e)),
        })?;

    tracing::info!(
        ue = %session.ue,
        ip_addr = %session.ue_addr,
        dnn = %session.dnn,
        gtp_upf = %session.uplink_fteid.addr,
        gtp_uplink_teid = session.uplink_fteid.teid,
        "New uplink path"
    );

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn release_session(
    State(state): State<AppState>,
    payload: Result<Json<SessionKey>, JsonRejection>,
) -> Result<Json<PduSession>, AppError> {
    let Json(key) = payload?;

    let session = state
        .sessions
        .release_session(&key.ue, key.addr, &key.dnn)
        .await
        .map_err(|e| AppError::NotFound(MessageWithError::new("unknown PDU session", e)))?;

    tracing::info!(
        ue = %session.ue,
        ip_addr = %session.ue_addr,
        dnn = %session.dnn,
        "PDU session released"
    );

    Ok(Json(session))
}
