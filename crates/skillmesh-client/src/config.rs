//! Client configuration

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Endpoints and budgets for both transport paths
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the dry-run compute gateway (fast path)
    pub gateway_url: String,
    /// Base URL of the messenger (fallback path and writes)
    pub messenger_url: String,
    /// Process id of the registry on the mesh
    pub process_id: String,
    /// Retry behaviour for the fast path
    pub retry: RetryPolicy,
    /// Timeout for each individual HTTP call
    pub request_timeout: Duration,
    /// How often the messenger result endpoint is polled
    pub poll_interval: Duration,
    /// Total time allowed for one messenger round trip
    pub poll_budget: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:4000".to_string(),
            messenger_url: "http://localhost:4010".to_string(),
            process_id: "registry".to_string(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),
            poll_budget: Duration::from_secs(20),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    pub fn with_messenger_url(mut self, url: impl Into<String>) -> Self {
        self.messenger_url = url.into();
        self
    }

    pub fn with_process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = process_id.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_budget(mut self, budget: Duration) -> Self {
        self.poll_budget = budget;
        self
    }
}
