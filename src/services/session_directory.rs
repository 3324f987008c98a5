use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use url::Url;
use crate::models::PduSession;
use crate::services::teid_pool::{TeidPool, TeidPoolError};
use crate::types::Fteid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("no PDU session for UE {ue} with address {addr} on DNN {dnn}")]
    SessionNotFound { ue: String, addr: IpAddr, dnn: String },

    #[error("no PDU session for UE {ue} on DNN {dnn}")]
    DnnSessionNotFound { ue: String, dnn: String },

    #[error("PDU session for UE {ue} with address {addr} on DNN {dnn} already exists")]
    SessionExists { ue: String, addr: IpAddr, dnn: String },

    #[error("could not allocate uplink TEID: {0}")]
    TeidAllocation(#[from] TeidPoolError),

    #[error("operation cancelled")]
    Cancelled,
}

/// Lookup and mutation of PDU sessions, as exposed by the SMF.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn get_session_uplink_fteid(
        &self,
        ue: &Url,
        addr: IpAddr,
        dnn: &str,
    ) -> Result<Fteid, DirectoryError>;

    async fn create_session_downlink(
        &self,
        cancel: &CancellationToken,
        ue: &Url,
        dnn: &str,
        gnb_addr: IpAddr,
        downlink_teid: u32,
    ) -> Result<PduSession, DirectoryError>;
}

pub struct InMemorySessionDirectory {
    sessions: RwLock<HashMap<Url, Vec<PduSession>>>,
    teids: Arc<TeidPool>,
    upf_addr: IpAddr,
}

impl InMemorySessionDirectory {
    pub fn new(teids: Arc<TeidPool>, upf_addr: IpAddr) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            teids,
            upf_addr,
        }
    }

    /// Creates a session with a freshly allocated uplink endpoint on the UPF.
    pub async fn create_session_uplink(
        &self,
        cancel: &CancellationToken,
        ue: &Url,
        ue_addr: IpAddr,
        dnn: &str,
    ) -> Result<PduSession, DirectoryError> {
        if cancel.is_cancelled() {
            return Err(DirectoryError::Cancelled);
        }

        let teid = self.teids.next(Some(cancel))?;
        let mut sessions = self.sessions.write().await;
        let entries = sessions.entry(ue.clone()).or_default();

        if entries.iter().any(|s| s.matches(ue, ue_addr, dnn)) {
            self.teids.release(teid);
            return Err(DirectoryError::SessionExists {
                ue: ue.to_string(),
                addr: ue_addr,
                dnn: dnn.to_string(),
            });
        }

        let session = PduSession {
            ue: ue.clone(),
            ue_addr,
            dnn: dnn.to_string(),
            uplink_fteid: Fteid::new(self.upf_addr, teid),
            downlink_fteid: None,
        };
        entries.push(session.clone());

        tracing::debug!(
            "Created uplink path for UE {} ({}) on DNN {}: {}",
            ue,
            ue_addr,
            dnn,
            session.uplink_fteid
        );

        Ok(session)
    }

    /// Removes a session and returns its uplink TEID to the pool.
    pub async fn release_session(
        &self,
        ue: &Url,
        ue_addr: IpAddr,
        dnn: &str,
    ) -> Result<PduSession, DirectoryError> {
        let mut sessions = self.sessions.write().await;
        let not_found = || DirectoryError::SessionNotFound {
            ue: ue.to_string(),
            addr: ue_addr,
            dnn: dnn.to_string(),
        };

        let entries = sessions.get_mut(ue).ok_or_else(not_found)?;
        let index = entries
            .iter()
            .position(|s| s.matches(ue, ue_addr, dnn))
            .ok_or_else(not_found)?;
        let session = entries.remove(index);
        if entries.is_empty() {
            sessions.remove(ue);
        }

        self.teids.release(session.uplink_fteid.teid);
        tracing::debug!(
            "Released PDU session for UE {} ({}) on DNN {}, {} TEID(s) outstanding",
            ue,
            ue_addr,
            dnn,
            self.teids.outstanding()
        );

        Ok(session)
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl SessionDirectory for InMemorySessionDirectory {
    async fn get_session_uplink_fteid(
        &self,
        ue: &Url,
        addr: IpAddr,
        dnn: &str,
    ) -> Result<Fteid, DirectoryError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(ue)
            .and_then(|entries| entries.iter().find(|s| s.matches(ue, addr, dnn)))
            .map(|s| s.uplink_fteid)
            .ok_or_else(|| DirectoryError::SessionNotFound {
                ue: ue.to_string(),
                addr,
                dnn: dnn.to_string(),
            })
    }

    async fn create_session_downlink(
        &self,
        cancel: &CancellationToken,
        ue: &Url,
        dnn: &str,
        gnb_addr: IpAddr,
        downlink_teid: u32,
    ) -> Result<PduSession, DirectoryError> {
        if cancel.is_cancelled() {
            return Err(DirectoryError::Cancelled);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(ue)
            .and_then(|entries| entries.iter_mut().find(|s| s.dnn == dnn))
            .ok_or_else(|| DirectoryError::DnnSessionNotFound {
                ue: ue.to_string(),
                dnn: dnn.to_string(),
            })?;

        session.downlink_fteid = Some(Fteid::new(gnb_addr, downlink_teid));
        Ok(session.clone())
    }
}
