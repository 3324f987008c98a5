use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;
use crate::services::outbound::{NotifierError, OutboundNotifier};
use crate::services::session_directory::{DirectoryError, SessionDirectory};
use crate::types::{Fteid, HandoverRequest, HandoverRequired, HandoverSession, SessionDescriptor};
use crate::utils::join_path;

pub const HANDOVER_REQUEST_PATH: &str = "ps/handover-request";

#[derive(Error, Debug)]
pub enum HandoverError {
    #[error("could not encode handover request: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("could not deliver handover request: {0}")]
    Delivery(#[from] NotifierError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoverPhase {
    Received,
    Resolving,
    Assembled,
    Delivered,
    Failed,
}

/// Outcome of the uplink lookup for one session of a Handover Required.
#[derive(Debug)]
pub struct SessionResolution {
    pub session: SessionDescriptor,
    pub outcome: Result<Fteid, DirectoryError>,
}

/// Turns Handover Required from the source gNB into Handover Request to the target gNB.
///
/// The same UPF keeps serving the sessions after handover, so each session
/// is relayed with its existing uplink FTEID. Sessions whose uplink cannot
/// be found are left out of the request; the others are still handed over.
#[derive(Clone)]
pub struct HandoverOrchestrator {
    directory: Arc<dyn SessionDirectory>,
    notifier: Arc<dyn OutboundNotifier>,
    lifecycle: CancellationToken,
}

impl HandoverOrchestrator {
    pub fn new(
        directory: Arc<dyn SessionDirectory>,
        notifier: Arc<dyn OutboundNotifier>,
        lifecycle: CancellationToken,
    ) -> Self {
        Self {
            directory,
            notifier,
            lifecycle,
        }
    }

    /// Processes the handover in the background. Failures only reach the logs.
    pub fn accept(&self, msg: HandoverRequired) -> JoinHandle<()> {
        let orchestrator = self.clone();
        let span = tracing::info_span!("handover", handover_id = %Uuid::new_v4(), ue = %msg.ue);

        tokio::spawn(
            async move {
                if let Err(e) = orchestrator.handle(msg).await {
                    tracing::error!(phase = ?HandoverPhase::Failed, "Handover failed: {}", e);
                }
            }
            .instrument(span),
        )
    }

    pub async fn handle(&self, msg: HandoverRequired) -> Result<HandoverRequest, HandoverError> {
        tracing::debug!(
            phase = ?HandoverPhase::Received,
            "Handover Required for UE {}",
            msg.ue
        );

        tracing::debug!(
            phase = ?HandoverPhase::Resolving,
            "Resolving {} session(s)",
            msg.sessions.len()
        );
        let resolutions = self.resolve_sessions(&msg).await;

        let request = Self::assemble(msg, resolutions);
        tracing::debug!(
            phase = ?HandoverPhase::Assembled,
            "Handover Request for UE {} carries {} session(s)",
            request.ue_ctrl,
            request.sessions.len()
        );

        let body = serde_json::to_vec(&request)?;
        let target = join_path(&request.target_gnb, HANDOVER_REQUEST_PATH)
            .ok_or_else(|| NotifierError::InvalidTarget(request.target_gnb.to_string()))?;
        self.notifier.send(&self.lifecycle, &target, body).await?;

        tracing::info!(
            phase = ?HandoverPhase::Delivered,
            ue = %request.ue_ctrl,
            gnb_target = %request.target_gnb,
            "Handover Request sent"
        );

        Ok(request)
    }

    /// Looks up the uplink FTEID of every session, in order.
    pub async fn resolve_sessions(
        &self,
        msg: &HandoverRequired,
    ) -> Vec<SessionResolution> {
        let mut resolutions = Vec::with_capacity(msg.sessions.len());
        for session in &msg.sessions {
            let outcome = self
                .directory
                .get_session_uplink_fteid(&msg.ue, session.addr, &session.dnn)
                .await;

            if let Err(ref e) = outcome {
                // TODO: notify the source gNB that this session was not handed over
                tracing::error!(
                    ue = %msg.ue,
                    ue_addr = %session.addr,
                    dnn = %session.dnn,
                    "Could not find Uplink FTEID for handover: {}",
                    e
                );
            }

            resolutions.push(SessionResolution {
                session: session.clone(),
                outcome,
            });
        }
        resolutions
    }

    pub fn assemble(msg: HandoverRequired, resolutions: Vec<SessionResolution>) -> HandoverRequest {
        let sessions = resolutions
            .into_iter()
            .filter_map(|r| {
                r.outcome.ok().map(|uplink_fteid| HandoverSession {
                    addr: r.session.addr,
                    dnn: r.session.dnn,
                    uplink_fteid,
                })
            })
            .collect();

        HandoverRequest {
            ue_ctrl: msg.ue,
            cp: msg.cp,
            target_gnb: msg.target_gnb,
            source_gnb: msg.source_gnb,
            sessions,
        }
    }
}
