use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use url::Url;
use super::Fteid;

/// A PDU session as named in N1/N2 signaling: UE address plus DNN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub addr: IpAddr,
    pub dnn: String,
}

/// Sent by the source gNB when the UE must move to another gNB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HandoverRequired {
    pub ue: Url,
    #[serde(rename = "gnb-source")]
    pub source_gnb: Url,
    #[serde(rename = "gnb-target")]
    pub target_gnb: Url,
    pub cp: Url,
    pub sessions: Vec<SessionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HandoverSession {
    pub addr: IpAddr,
    pub dnn: String,
    pub uplink_fteid: Fteid,
}

/// Sent by the control plane to the target gNB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HandoverRequest {
    #[serde(rename = "ue")]
    pub ue_ctrl: Url,
    pub cp: Url,
    #[serde(rename = "gnb-target")]
    pub target_gnb: Url,
    #[serde(rename = "gnb-source")]
    pub source_gnb: Url,
    pub sessions: Vec<HandoverSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PduSessionHeader {
    pub ue: Url,
    pub gnb: Url,
    pub dnn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PduSessionInfo {
    pub header: PduSessionHeader,
    pub addr: IpAddr,
}

/// N2 PDU session resource setup response: the gNB confirms its downlink endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct N2PduSessionRespMsg {
    pub ue_info: PduSessionInfo,
    pub gnb: IpAddr,
    pub downlink_teid: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handover_required_deserialize() {
        let payload = serde_json::json!({
            "ue": "http://ue.example/",
            "gnb-source": "http://gnb1.example:8080/",
            "gnb-target": "http://gnb2.example:8080/",
            "cp": "http://cp.example:8000/",
            "sessions": [
                { "addr": "10.0.0.1", "dnn": "internet" },
                { "addr": "10.0.0.2", "dnn": "ims" }
            ]
        });

        let msg: HandoverRequired = serde_json::from_value(payload).unwrap();
        assert_eq!(msg.target_gnb.as_str(), "http://gnb2.example:8080/");
        assert_eq!(msg.sessions.len(), 2);
        assert_eq!(msg.sessions[1].dnn, "ims");
    }

    #[test]
    fn test_handover_required_rejects_bad_address() {
        let payload = serde_json::json!({
            "ue": "http://ue.example/",
            "gnb-source": "http://gnb1.example/",
            "gnb-target": "http://gnb2.example/",
            "cp": "http://cp.example/",
            "sessions": [{ "addr": "not-an-ip", "dnn": "internet" }]
        });

        assert!(serde_json::from_value::<HandoverRequired>(payload).is_err());
    }

    #[test]
    fn test_handover_request_field_names() {
        let request = HandoverRequest {
            ue_ctrl: "http://ue.example/".parse().unwrap(),
            cp: "http://cp.example/".parse().unwrap(),
            target_gnb: "http://gnb2.example/".parse().unwrap(),
            source_gnb: "http://gnb1.example/".parse().unwrap(),
            sessions: vec![HandoverSession {
                addr: "10.0.0.1".parse().unwrap(),
                dnn: "internet".to_string(),
                uplink_fteid: Fteid::new("1.2.3.4".parse().unwrap(), 777),
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["ue"], "http://ue.example/");
        assert_eq!(value["gnb-target"], "http://gnb2.example/");
        assert_eq!(value["gnb-source"], "http://gnb1.example/");
        assert_eq!(value["sessions"][0]["uplink-fteid"]["teid"], 777);
        assert_eq!(value["sessions"][0]["uplink-fteid"]["addr"], "1.2.3.4");
    }

    #[test]
    fn test_n2_establishment_response_deserialize() {
        let payload = serde_json::json!({
            "ue-info": {
                "header": {
                    "ue": "http://ue.example/",
                    "gnb": "http://gnb2.example/",
                    "dnn": "internet"
                },
                "addr": "10.0.0.1"
            },
            "gnb": "192.168.0.2",
            "downlink-teid": 4242
        });

        let msg: N2PduSessionRespMsg = serde_json::from_value(payload).unwrap();
        assert_eq!(msg.ue_info.header.dnn, "internet");
        assert_eq!(msg.gnb, "192.168.0.2".parse::<IpAddr>().unwrap());
        assert_eq!(msg.downlink_teid, 4242);
    }
}
