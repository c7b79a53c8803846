//! The registry as a running process: one task owns the store, callers
//! talk to it through a mailbox
//!
//! Requests carry a oneshot reply channel, so callers get exactly one
//! response and the store never needs a lock. Dropping every handle
//! closes the mailbox and the process loop exits on its own.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use skillmesh_types::RegistryRequest;

use crate::error::ProcessError;
use crate::store::RegistryStore;

const CHANNEL_CAPACITY: usize = 64;

struct Envelope {
    request: RegistryRequest,
    reply_tx: oneshot::Sender<Value>,
}

/// Cloneable sender half used by transports and tests
#[derive(Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<Envelope>,
}

impl RegistryHandle {
    /// Send a request and wait for the single reply
    pub async fn call(&self, request: RegistryRequest) -> Result<Value, ProcessError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply_tx })
            .await
            .map_err(|_| ProcessError::Closed)?;
        reply_rx.await.map_err(|_| ProcessError::Closed)
    }
}

/// The owning half: drives the store until every handle is dropped
pub struct RegistryProcess {
    store: RegistryStore,
    rx: mpsc::Receiver<Envelope>,
}

impl RegistryProcess {
    pub fn new() -> (Self, RegistryHandle) {
        Self::with_store(RegistryStore::new())
    }

    /// Start from pre-seeded state
    pub fn with_store(store: RegistryStore) -> (Self, RegistryHandle) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { store, rx }, RegistryHandle { tx })
    }

    /// Spawn the process loop onto the runtime
    pub fn spawn() -> (RegistryHandle, JoinHandle<()>) {
        let (process, handle) = Self::new();
        let join = tokio::spawn(process.run());
        (handle, join)
    }

    /// Serve requests until the mailbox closes
    pub async fn run(mut self) {
        info!("registry process started");
        while let Some(envelope) = self.rx.recv().await {
            let reply = self.store.handle(&envelope.request);
            // Caller may have given up waiting; that is their business
            let _ = envelope.reply_tx.send(reply);
        }
        info!("registry process stopped");
    }
}
