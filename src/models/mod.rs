use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use url::Url;
use crate::types::Fteid;

/// One active data path for one UE on one DNN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PduSession {
    pub ue: Url,
    pub ue_addr: IpAddr,
    pub dnn: String,
    pub uplink_fteid: Fteid,
    pub downlink_fteid: Option<Fteid>,
}

impl PduSession {
    pub fn matches(&self, ue: &Url, ue_addr: IpAddr, dnn: &str) -> bool {
        &self.ue == ue && self.ue_addr == ue_addr && self.dnn == dnn
    }
}

/// Emitted once the new gNB has confirmed the downlink path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEstablished {
    pub ue: Url,
    pub gnb: Url,
    pub ue_addr: IpAddr,
    pub dnn: String,
    pub uplink_fteid: Fteid,
    pub downlink_fteid: Fteid,
    pub established_at: DateTime<Utc>,
}
