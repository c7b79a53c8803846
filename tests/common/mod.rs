//! Shared wiring for the workspace-level tests: a real registry actor
//! exposed to the typed client through the transport seam, so every flow
//! crosses the same crate boundaries a deployed mesh would.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use skillmesh_client::{RegistryClient, RetryPolicy, Transport, TransportError};
use skillmesh_registry::{RegistryHandle, RegistryProcess};
use skillmesh_types::{RegisterSkillParams, RegistryRequest, SkillDependency};

/// Delivers requests straight into an in-process registry mailbox
pub struct ProcessTransport {
    handle: RegistryHandle,
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn query(&self, request: &RegistryRequest) -> Result<Value, TransportError> {
        self.handle
            .call(request.clone())
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "in-process"
    }
}

/// Spawn a registry actor and a client wired to it on both paths
pub fn live_client() -> RegistryClient {
    let (handle, _process) = RegistryProcess::spawn();
    let transport = Arc::new(ProcessTransport { handle });
    RegistryClient::with_transports(transport.clone(), transport, RetryPolicy::default())
}

/// Register a version through the real handler, not by poking a store
pub async fn register(
    client: &RegistryClient,
    name: &str,
    version: &str,
    dependencies: Vec<SkillDependency>,
    content_id: &str,
) {
    let params = RegisterSkillParams {
        name: name.to_string(),
        version: version.to_string(),
        description: format!("{name} fixture"),
        author: "integration".to_string(),
        tags: vec!["fixture".to_string()],
        dependencies,
        content_id: content_id.to_string(),
        license: None,
    };
    client
        .register_skill(&params)
        .await
        .unwrap_or_else(|e| panic!("failed to register {name}@{version}: {e}"));
}
