//! Message signing seam
//!
//! Key custody is someone else's problem: the client hands the serialized
//! envelope to a [`Signer`] and sends whatever comes back. The development
//! default passes bytes through untouched.

use async_trait::async_trait;

use crate::error::TransportError;

/// Produces a signed envelope the messenger will accept
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// Pass-through signer for development and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsignedSigner;

#[async_trait]
impl Signer for UnsignedSigner {
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        Ok(payload.to_vec())
    }
}
