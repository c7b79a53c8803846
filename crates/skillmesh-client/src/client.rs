//! Typed client API over the dual-path machinery

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use skillmesh_types::{
    actions, AckReply, AggregateStats, ErrorReply, InfoReply, ListParams, ListReply,
    RecordDownloadParams, RegisterSkillParams, RegistryRequest, SearchParams, SearchReply,
    SkillReply, SkillStats, TimeRange, VersionHistoryReply,
};

use crate::config::ClientConfig;
use crate::dual_path::{run_dual_path, run_single_path};
use crate::error::{ClientError, Result, TransportError};
use crate::gateway::DryRunTransport;
use crate::messenger::MessengerTransport;
use crate::retry::RetryPolicy;
use crate::signer::{Signer, UnsignedSigner};
use crate::transport::Transport;

/// Registry client speaking both transport paths
///
/// Reads race down the dry-run gateway and degrade to the messenger;
/// writes go straight to the messenger because they must be signed.
pub struct RegistryClient {
    fast: Arc<dyn Transport>,
    fallback: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RegistryClient {
    /// Build a client with the pass-through development signer
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_signer(config, Arc::new(UnsignedSigner))
    }

    /// Build a client that signs messenger traffic with `signer`
    pub fn with_signer(config: ClientConfig, signer: Arc<dyn Signer>) -> Result<Self> {
        let fast = DryRunTransport::new(&config)?;
        let fallback = MessengerTransport::new(&config, signer)?;
        Ok(Self {
            fast: Arc::new(fast),
            fallback: Arc::new(fallback),
            policy: config.retry,
        })
    }

    /// Run against arbitrary transports; the seam tests and embedders use
    pub fn with_transports(
        fast: Arc<dyn Transport>,
        fallback: Arc<dyn Transport>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            fast,
            fallback,
            policy,
        }
    }

    async fn read(&self, action: &str, data: Value) -> Result<Value> {
        let request = RegistryRequest::new(action, data);
        run_dual_path(
            self.fast.as_ref(),
            self.fallback.as_ref(),
            &self.policy,
            &request,
        )
        .await
    }

    async fn write(&self, action: &str, data: Value) -> Result<Value> {
        let request = RegistryRequest::new(action, data);
        run_single_path(self.fallback.as_ref(), &self.policy, &request).await
    }

    /// Search by free-text query
    pub async fn search(&self, query: &str) -> Result<SearchReply> {
        self.search_with(&SearchParams {
            query: query.to_string(),
            limit: None,
        })
        .await
    }

    pub async fn search_with(&self, params: &SearchParams) -> Result<SearchReply> {
        let payload = self.read(actions::SEARCH, encode_params(params)?).await?;
        decode(payload)
    }

    /// Paginated listing with filters
    pub async fn list(&self, params: &ListParams) -> Result<ListReply> {
        let payload = self.read(actions::LIST, encode_params(params)?).await?;
        decode(payload)
    }

    /// Latest version of a skill; "not found" arrives in-band in the reply
    pub async fn get_skill(&self, name: &str) -> Result<SkillReply> {
        let payload = self.read(actions::GET, json!({ "name": name })).await?;
        decode(payload)
    }

    /// Full version history, newest first
    pub async fn get_versions(&self, name: &str) -> Result<VersionHistoryReply> {
        let payload = self
            .read(actions::GET_VERSIONS, json!({ "name": name }))
            .await?;
        decode(payload)
    }

    /// Registry-wide download counts for a window
    pub async fn aggregate_stats(&self, range: TimeRange) -> Result<AggregateStats> {
        let payload = self
            .read(
                actions::GET_DOWNLOAD_STATS,
                json!({ "scope": "all", "timeRange": range.as_str() }),
            )
            .await?;
        decode(payload)
    }

    /// Download counts for one skill
    pub async fn skill_stats(&self, name: &str, range: TimeRange) -> Result<SkillStats> {
        let payload = self
            .read(
                actions::GET_DOWNLOAD_STATS,
                json!({ "name": name, "timeRange": range.as_str() }),
            )
            .await?;
        decode(payload)
    }

    /// Capability introspection
    pub async fn info(&self) -> Result<InfoReply> {
        let payload = self.read(actions::INFO, json!({})).await?;
        decode(payload)
    }

    /// Publish a skill version
    pub async fn register_skill(&self, params: &RegisterSkillParams) -> Result<AckReply> {
        let payload = self
            .write(actions::REGISTER_SKILL, encode_params(params)?)
            .await?;
        decode(payload)
    }

    /// Report a completed download
    pub async fn record_download(&self, params: &RecordDownloadParams) -> Result<AckReply> {
        let payload = self
            .write(actions::RECORD_DOWNLOAD, encode_params(params)?)
            .await?;
        decode(payload)
    }
}

fn encode_params<T: Serialize>(params: &T) -> Result<Value> {
    serde_json::to_value(params)
        .map_err(|e| ClientError::Transport(TransportError::Parse(e.to_string())))
}

/// Parse a handler payload into the expected reply type
///
/// When the shape does not match, the payload may still be a well-formed
/// in-band error; that becomes [`ClientError::Registry`]. Anything else is
/// a parse failure on an otherwise healthy transport.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    match serde_json::from_value::<T>(payload.clone()) {
        Ok(reply) => Ok(reply),
        Err(parse_err) => match serde_json::from_value::<ErrorReply>(payload) {
            Ok(error_reply) => Err(ClientError::Registry(error_reply.error)),
            Err(_) => Err(ClientError::Transport(TransportError::Parse(
                parse_err.to_string(),
            ))),
        },
    }
}
