//! Fast path: stateless dry-run evaluation on a compute gateway
//!
//! A dry-run never commits the message to the process log, which is why
//! only reads go this way.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use skillmesh_types::RegistryRequest;

use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError};
use crate::transport::{unwrap_process_reply, Transport};

/// Transport that evaluates requests against the gateway's dry-run endpoint
#[derive(Debug)]
pub struct DryRunTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl DryRunTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        let raw = format!("{}/dry-run", config.gateway_url.trim_end_matches('/'));
        let mut endpoint = Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("Invalid gateway URL {raw}: {e}")))?;
        endpoint
            .query_pairs_mut()
            .append_pair("process-id", &config.process_id);

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl Transport for DryRunTransport {
    async fn query(&self, request: &RegistryRequest) -> Result<Value, TransportError> {
        debug!(action = %request.action, endpoint = %self.endpoint, "dry-run query");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
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
        unwrap_process_reply(&body)
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}
