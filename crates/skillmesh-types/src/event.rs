//! Download events recorded by the registry

use serde::{Deserialize, Serialize};

/// One recorded download of a skill version
///
/// Append-only: events are never mutated or deleted, and their timestamps are
/// not validated against the registry clock at write time. Window filtering
/// happens on the read side only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEvent {
    /// Name of the downloaded skill
    pub skill_name: String,
    /// Downloaded version
    pub version: String,
    /// Identifier of the requester (address or opaque client id)
    pub requester_id: String,
    /// Reported download time, epoch milliseconds
    pub timestamp: i64,
}
