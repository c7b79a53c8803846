//! Request envelope shared by every transport
//!
//! A [`RegistryRequest`] is what both the dry-run gateway and the messenger
//! deliver to the registry process: an action name, a JSON parameter object,
//! and the sender address when the message was signed. The registry's reply
//! is the handler payload itself; transports wrap and unwrap their own
//! framing around these two shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire action names understood by the registry process
pub mod actions {
    pub const SEARCH: &str = "Search";
    pub const LIST: &str = "List";
    pub const GET: &str = "Get";
    pub const GET_VERSIONS: &str = "Get-Versions";
    pub const GET_DOWNLOAD_STATS: &str = "Get-Download-Stats";
    pub const INFO: &str = "Info";
    pub const REGISTER_SKILL: &str = "Register-Skill";
    pub const RECORD_DOWNLOAD: &str = "Record-Download";

    /// All actions, in the order reported by `Info`
    pub const ALL: [&str; 8] = [
        SEARCH,
        LIST,
        GET,
        GET_VERSIONS,
        GET_DOWNLOAD_STATS,
        INFO,
        REGISTER_SKILL,
        RECORD_DOWNLOAD,
    ];
}

/// A message addressed to the registry process
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryRequest {
    /// Action name, one of [`actions`]
    pub action: String,
    /// Action parameters as a JSON object
    #[serde(default)]
    pub data: Value,
    /// Sender address, present when the message was signed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl RegistryRequest {
    /// Build a request for an action with JSON parameters
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
            sender: None,
        }
    }

    /// Attach a sender address to the request
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}
