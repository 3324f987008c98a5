use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::models::{PduSession, SessionEstablished};
use crate::services::session_directory::{DirectoryError, SessionDirectory};
use crate::types::N2PduSessionRespMsg;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Error, Debug)]
pub enum EstablishmentError {
    #[error("could not create downlink path: {0}")]
    DownlinkEstablishmentFailed(#[from] DirectoryError),
}

/// Records the downlink path confirmed by a gNB in its N2 PDU session response.
pub struct EstablishmentRecorder {
    directory: Arc<dyn SessionDirectory>,
    events: broadcast::Sender<SessionEstablished>,
}

impl EstablishmentRecorder {
    pub fn new(directory: Arc<dyn SessionDirectory>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { directory, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEstablished> {
        self.events.subscribe()
    }

    pub async fn record(
        &self,
        cancel: &CancellationToken,
        msg: &N2PduSessionRespMsg,
    ) -> Result<PduSession, EstablishmentError> {
        let header = &msg.ue_info.header;

        let session = self
            .directory
            .create_session_downlink(cancel, &header.ue, &header.dnn, msg.gnb, msg.downlink_teid)
            .await
            .map_err(|e| {
                tracing::error!(
                    ue_ip_addr = %msg.ue_info.addr,
                    ue = %header.ue,
                    gnb = %header.gnb,
                    dnn = %header.dnn,
                    "could not create downlink path: {}",
                    e
                );
                e
            })?;

        let Some(downlink_fteid) = session.downlink_fteid else {
            tracing::error!(
                ue = %header.ue,
                gnb = %header.gnb,
                dnn = %header.dnn,
                "Session directory returned no downlink path"
            );
            return Err(DirectoryError::DnnSessionNotFound {
                ue: header.ue.to_string(),
                dnn: header.dnn.clone(),
            }
            .into());
        };

        tracing::info!(
            ue = %header.ue,
            gnb = %header.gnb,
            ip_addr = %msg.ue_info.addr,
            gtp_upf = %session.uplink_fteid.addr,
            gtp_uplink_teid = session.uplink_fteid.teid,
            gtp_gnb = %downlink_fteid.addr,
            gtp_downlink_teid = downlink_fteid.teid,
            dnn = %header.dnn,
            "New PDU Session Established"
        );

        // Nobody listening is fine.
        let _ = self.events.send(SessionEstablished {
            ue: header.ue.clone(),
            gnb: header.gnb.clone(),
            ue_addr: msg.ue_info.addr,
            dnn: header.dnn.clone(),
            uplink_fteid: session.uplink_fteid,
            downlink_fteid,
            established_at: Utc::now(),
        });

        Ok(session)
    }

    /// Consumes completion events until `lifecycle` ends; returns how many were seen.
    pub fn spawn_audit(&self, lifecycle: CancellationToken) -> JoinHandle<u64> {
        let mut events = self.subscribe();

        tokio::spawn(async move {
            let mut seen = 0;
            loop {
                tokio::select! {
                    biased;
                    event = events.recv() => match event {
                        Ok(event) => {
                            seen += 1;
                            tracing::debug!(
                                ue = %event.ue,
                                dnn = %event.dnn,
                                uplink = %event.uplink_fteid,
                                downlink = %event.downlink_fteid,
                                established_at = %event.established_at,
                                "PDU session audit"
                            );
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("PDU session audit lagged, {} event(s) dropped", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = lifecycle.cancelled() => break,
                }
            }
            seen
        })
    }
}
