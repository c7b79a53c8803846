//! Retry and failover as an explicit state machine
//!
//! One logical query walks `Attempt -> Backoff -> Attempt -> ... ->
//! Fallback -> Done`. Keeping the control flow in a state enum, instead of
//! nested error handling, makes the double-failure rule mechanical: the
//! error that ended the fast path rides along in `Fallback` and is the one
//! surfaced when the fallback fails too.

use serde_json::Value;
use tracing::{debug, warn};

use skillmesh_types::RegistryRequest;

use crate::error::{ClientError, TransportError};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

#[derive(Debug)]
enum DualPathState {
    /// Run fast-path attempt number `attempt` (1-based)
    Attempt { attempt: u32 },
    /// Sleep out the backoff after a retryable failure
    Backoff { attempt: u32, error: TransportError },
    /// Fast path is spent; consult the fallback once
    Fallback { original: TransportError },
    Done(Result<Value, TransportError>),
}

/// Drive a read query through the fast path with retries, then the fallback
pub async fn run_dual_path(
    fast: &dyn Transport,
    fallback: &dyn Transport,
    policy: &RetryPolicy,
    request: &RegistryRequest,
) -> Result<Value, ClientError> {
    let mut state = DualPathState::Attempt { attempt: 1 };
    loop {
        state = match state {
            DualPathState::Attempt { attempt } => {
                match bounded_attempt(fast, policy, request).await {
                    Ok(payload) => DualPathState::Done(Ok(payload)),
                    Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                        DualPathState::Backoff { attempt, error }
                    }
                    Err(error) => DualPathState::Fallback { original: error },
                }
            }
            DualPathState::Backoff { attempt, error } => {
                let delay = policy.delay_for(attempt);
                debug!(
                    transport = fast.name(),
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                DualPathState::Attempt {
                    attempt: attempt + 1,
                }
            }
            DualPathState::Fallback { original } => {
                warn!(
                    fast = fast.name(),
                    fallback = fallback.name(),
                    error = %original,
                    "fast path exhausted, degrading to fallback"
                );
                // The fallback budgets its own time, so no outer timeout here
                match fallback.query(request).await {
                    Ok(payload) => {
                        debug!(fallback = fallback.name(), "fallback served the query");
                        DualPathState::Done(Ok(payload))
                    }
                    Err(fallback_error) => {
                        warn!(
                            fallback = fallback.name(),
                            error = %fallback_error,
                            "fallback failed too, surfacing the original error"
                        );
                        DualPathState::Done(Err(original))
                    }
                }
            }
            DualPathState::Done(result) => return result.map_err(ClientError::Transport),
        };
    }
}

/// Write variant: same retry schedule, single transport, no failover
pub async fn run_single_path(
    transport: &dyn Transport,
    policy: &RetryPolicy,
    request: &RegistryRequest,
) -> Result<Value, ClientError> {
    let mut attempt = 1;
    loop {
        match transport.query(request).await {
            Ok(payload) => return Ok(payload),
            Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                debug!(
                    transport = transport.name(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(ClientError::Transport(error)),
        }
    }
}

async fn bounded_attempt(
    transport: &dyn Transport,
    policy: &RetryPolicy,
    request: &RegistryRequest,
) -> Result<Value, TransportError> {
    match tokio::time::timeout(policy.attempt_timeout, transport.query(request)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(policy.attempt_timeout)),
    }
}
