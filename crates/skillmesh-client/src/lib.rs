//! Dual-path client for the skillmesh registry
//!
//! Every read is tried on the stateless dry-run gateway first, with
//! bounded retries, and transparently degrades to the committed messenger
//! path when the gateway is unhealthy. Writes are signed and go through
//! the messenger only. Callers work with typed replies and never learn
//! which path served them.

pub mod client;
pub mod config;
pub mod dual_path;
pub mod error;
pub mod gateway;
pub mod messenger;
pub mod retry;
pub mod signer;
pub mod transport;

pub use client::RegistryClient;
pub use config::ClientConfig;
pub use dual_path::{run_dual_path, run_single_path};
pub use error::{ClientError, Result, TransportError};
pub use gateway::DryRunTransport;
pub use messenger::MessengerTransport;
pub use retry::RetryPolicy;
pub use signer::{Signer, UnsignedSigner};
pub use transport::Transport;
