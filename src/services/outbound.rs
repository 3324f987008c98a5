use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("cannot address {0}")]
    InvalidTarget(String),

    #[error("request to {target} failed: {source}")]
    Transport {
        target: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} answered with status {status}")]
    Rejected { target: Url, status: StatusCode },

    #[error("request to {0} cancelled")]
    Cancelled(Url),
}

/// Outbound N1/N2 transport towards gNBs.
#[async_trait]
pub trait OutboundNotifier: Send + Sync {
    async fn send(
        &self,
        cancel: &CancellationToken,
        target: &Url,
        payload: Vec<u8>,
    ) -> Result<(), NotifierError>;
}

pub struct HttpNotifier {
    client: Client,
    user_agent: String,
}

impl HttpNotifier {
    pub fn new(user_agent: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            user_agent,
        }
    }
}

#[async_trait]
impl OutboundNotifier for HttpNotifier {
    async fn send(
        &self,
        cancel: &CancellationToken,
        target: &Url,
        payload: Vec<u8>,
    ) -> Result<(), NotifierError> {
        let request = self
            .client
            .post(target.clone())
            .header(header::USER_AGENT, self.user_agent.as_str())
            .header(header::CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(payload)
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(NotifierError::Cancelled(target.clone())),
            response = request => response.map_err(|source| NotifierError::Transport {
                target: target.clone(),
                source,
            })?,
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!("POST {} answered {}", target, status);
            Ok(())
        } else {
            Err(NotifierError::Rejected {
                target: target.clone(),
                status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier() -> HttpNotifier {
        HttpNotifier::new("cp-lite-test".to_string(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_send_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ps/handover-request"))
            .and(header("user-agent", "cp-lite-test"))
            .and(header("content-type", "application/json; charset=UTF-8"))
            .and(body_json(serde_json::json!({ "hello": "gnb" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let target: Url = format!("{}/ps/handover-request", server.uri()).parse().unwrap();
        let payload = serde_json::to_vec(&serde_json::json!({ "hello": "gnb" })).unwrap();

        notifier()
            .send(&CancellationToken::new(), &target, payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_reports_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let target: Url = format!("{}/ps/handover-request", server.uri()).parse().unwrap();
        let err = notifier()
            .send(&CancellationToken::new(), &target, b"{}".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NotifierError::Rejected { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_send_abandoned_on_cancellation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        let target: Url = format!("{}/ps/handover-request", server.uri()).parse().unwrap();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = notifier().send(&token, &target, b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, NotifierError::Cancelled(_)));
    }
}
