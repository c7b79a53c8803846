//! Fallback path: committed messages through the mesh messenger
//!
//! The messenger accepts a signed envelope, commits it to the process's
//! message log, and exposes the handler result for polling. Slower than a
//! dry-run, but it is the only path that can mutate state, so writes
//! always come here.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use skillmesh_types::RegistryRequest;

use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError};
use crate::signer::Signer;
use crate::transport::{unwrap_process_reply, Transport};

/// Transport that sends signed messages and polls for their results
pub struct MessengerTransport {
    http: reqwest::Client,
    send_endpoint: Url,
    results_base: Url,
    signer: Arc<dyn Signer>,
    poll_interval: std::time::Duration,
    poll_budget: std::time::Duration,
}

impl MessengerTransport {
    pub fn new(config: &ClientConfig, signer: Arc<dyn Signer>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        let base = config.messenger_url.trim_end_matches('/');
        let send_raw = format!("{base}/processes/{}/messages", config.process_id);
        let send_endpoint = Url::parse(&send_raw)
            .map_err(|e| ClientError::Config(format!("Invalid messenger URL {send_raw}: {e}")))?;
        let results_raw = format!("{base}/processes/{}/results/", config.process_id);
        let results_base = Url::parse(&results_raw)
            .map_err(|e| ClientError::Config(format!("Invalid messenger URL {results_raw}: {e}")))?;

        Ok(Self {
            http,
            send_endpoint,
            results_base,
            signer,
            poll_interval: config.poll_interval,
            poll_budget: config.poll_budget,
        })
    }

    async fn send(&self, request: &RegistryRequest) -> Result<String, TransportError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| TransportError::Parse(format!("failed to encode request: {e}")))?;
        let signed = self.signer.sign(&payload).await?;

        let response = self
            .http
            .post(self.send_endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(signed)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;
        body.get("messageId")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| TransportError::Parse("send reply carried no messageId".to_string()))
    }

    async fn poll_result(&self, message_id: &str) -> Result<Value, TransportError> {
        let endpoint = self
            .results_base
            .join(message_id)
            .map_err(|e| TransportError::Parse(format!("invalid messageId {message_id}: {e}")))?;

        let deadline = Instant::now() + self.poll_budget;
        loop {
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .http
                .get(endpoint.clone())
                .send()
                .await
                .map_err(TransportError::from_reqwest)?;
            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(TransportError::Http {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| TransportError::Parse(e.to_string()))?;
            match body.get("status").and_then(Value::as_str) {
                Some("done") => return unwrap_process_reply(&body),
                Some("pending") => {
                    if Instant::now() >= deadline {
                        return Err(TransportError::Timeout(self.poll_budget));
                    }
                    debug!(message_id, "result still pending");
                }
                other => {
                    return Err(TransportError::Parse(format!(
                        "unexpected result status: {other:?}"
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl Transport for MessengerTransport {
    async fn query(&self, request: &RegistryRequest) -> Result<Value, TransportError> {
        debug!(action = %request.action, "messenger query");
        let message_id = self.send(request).await?;
        debug!(message_id, "message accepted, polling for result");
        self.poll_result(&message_id).await
    }

    fn name(&self) -> &'static str {
        "messenger"
    }
}
