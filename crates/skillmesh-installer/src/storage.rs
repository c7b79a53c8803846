//! Content-addressed bundle storage
//!
//! Bundles live on a permanent storage network and are fetched by content
//! id. The network itself is opaque behind [`StorageGateway`]; the HTTP
//! implementation talks to a gateway node, the in-memory one backs tests
//! and addresses blobs by their sha256 digest.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{InstallError, Result};

/// Fetch and publish skill bundles by content id
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Fetch the bundle bytes stored under `content_id`
    async fn download(&self, content_id: &str) -> Result<Vec<u8>>;

    /// Store `bytes` and return the content id they are addressable under
    async fn upload(&self, bytes: &[u8]) -> Result<String>;
}

/// Gateway node speaking plain HTTP: `GET {base}/{contentId}` to fetch,
/// `POST {base}` to publish
pub struct HttpStorageGateway {
    http: reqwest::Client,
    base: String,
}

impl HttpStorageGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InstallError::Configuration(format!("storage HTTP client: {e}")))?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StorageGateway for HttpStorageGateway {
    async fn download(&self, content_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{content_id}", self.base);
        debug!(%content_id, "fetching bundle");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| InstallError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(InstallError::Network(format!(
                "storage returned {} for {content_id}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InstallError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let response = self
            .http
            .post(&self.base)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| InstallError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(InstallError::Network(format!(
                "storage upload returned {}",
                response.status()
            )));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| InstallError::Parse(format!("upload reply is not JSON: {e}")))?;
        body.get("contentId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| InstallError::Parse("upload reply carried no contentId".to_string()))
    }
}

/// In-memory store; content ids are sha256 hex digests of the bytes
#[derive(Default)]
pub struct MemoryStorageGateway {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The content id `upload` would assign to `bytes`
    pub fn content_id_for(bytes: &[u8]) -> String {
        format!("{:x}", Sha256::digest(bytes))
    }
}

#[async_trait]
impl StorageGateway for MemoryStorageGateway {
    async fn download(&self, content_id: &str) -> Result<Vec<u8>> {
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs
            .get(content_id)
            .cloned()
            .ok_or_else(|| InstallError::Network(format!("content {content_id} not found")))
    }

    async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let content_id = Self::content_id_for(bytes);
        let mut blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.insert(content_id.clone(), bytes.to_vec());
        Ok(content_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_download_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cid-123"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bundle-bytes".to_vec()))
            .mount(&server)
            .await;

        let gateway = HttpStorageGateway::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let bytes = gateway.download("cid-123").await.unwrap();
        assert_eq!(bytes, b"bundle-bytes");
    }

    #[tokio::test]
    async fn test_http_download_missing_content_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cid-missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let gateway = HttpStorageGateway::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = gateway.download("cid-missing").await.unwrap_err();
        assert!(matches!(err, InstallError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_http_upload_extracts_content_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "contentId": "cid-new" })),
            )
            .mount(&server)
            .await;

        let gateway = HttpStorageGateway::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let content_id = gateway.upload(b"payload").await.unwrap();
        assert_eq!(content_id, "cid-new");
    }

    #[tokio::test]
    async fn test_memory_roundtrip_by_digest() {
        let gateway = MemoryStorageGateway::new();
        let content_id = gateway.upload(b"hello bundle").await.unwrap();
        assert_eq!(content_id, MemoryStorageGateway::content_id_for(b"hello bundle"));

        let bytes = gateway.download(&content_id).await.unwrap();
        assert_eq!(bytes, b"hello bundle");
    }

    #[tokio::test]
    async fn test_memory_missing_content_errors() {
        let gateway = MemoryStorageGateway::new();
        let err = gateway.download("nope").await.unwrap_err();
        assert!(matches!(err, InstallError::Network(_)), "got {err:?}");
    }
}
