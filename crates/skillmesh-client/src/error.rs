//! Client error taxonomy
//!
//! [`TransportError`] classifies a single transport attempt; its
//! [`is_retryable`] split drives the retry loop. [`ClientError`] is what
//! callers see: transport exhaustion, an in-band registry error, or a
//! configuration problem.
//!
//! [`is_retryable`]: TransportError::is_retryable

use std::time::Duration;

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// A single transport attempt's failure classification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection-level failure: DNS, refused, reset
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the transport endpoint
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Body arrived but could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Attempt exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Payload could not be signed for the messenger path
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed
    ///
    /// Network and timeout failures are transient; 5xx means the far side
    /// broke, not us. A 4xx is our request and will fail again, and a parse
    /// or signing failure will not improve with repetition.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network(_) | TransportError::Timeout(_) => true,
            TransportError::Http { status, .. } => *status >= 500,
            TransportError::Parse(_) | TransportError::Signing(_) => false,
        }
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(Duration::from_secs(0))
        } else if err.is_decode() {
            TransportError::Parse(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Failure surfaced to the caller of the typed client API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Both paths failed; carries the original fast-path classification
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The registry answered with an in-band error payload
    #[error("Registry error: {0}")]
    Registry(String),

    /// A required setting is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}
