//! Reply payloads produced by registry handlers
//!
//! Lookups report "not found" in-band with a `status` field instead of
//! failing the transport, so a missing skill is distinguishable from a
//! broken connection on the client side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::skill::SkillVersion;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Reply to `Search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReply {
    pub results: Vec<SkillVersion>,
    pub total: u64,
    pub query: String,
}

/// Page descriptor attached to `List` replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub returned: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Reply to `List`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReply {
    pub skills: Vec<SkillVersion>,
    pub pagination: Pagination,
}

/// Reply to `Get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillVersion>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SkillReply {
    pub fn found(skill: SkillVersion) -> Self {
        Self {
            skill: Some(skill),
            status: STATUS_SUCCESS.to_string(),
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            skill: None,
            status: STATUS_ERROR.to_string(),
            error: Some("Skill not found".to_string()),
        }
    }
}

/// Reply to `Get-Versions`, history ordered newest-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionHistoryReply {
    pub versions: Vec<SkillVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    pub total: u64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VersionHistoryReply {
    pub fn found(versions: Vec<SkillVersion>, latest: String) -> Self {
        let total = versions.len() as u64;
        Self {
            versions,
            latest: Some(latest),
            total,
            status: STATUS_SUCCESS.to_string(),
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            versions: Vec::new(),
            latest: None,
            total: 0,
            status: STATUS_ERROR.to_string(),
            error: Some("Skill not found".to_string()),
        }
    }
}

/// Acknowledgment for write actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckReply {
    pub status: String,
    pub action: String,
}

impl AckReply {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            action: action.into(),
        }
    }
}

/// In-band handler failure, e.g. a missing required parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub status: String,
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error: error.into(),
        }
    }
}

/// Identity block inside an `Info` reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub capabilities: Vec<String>,
    /// Input schema per handler, keyed by action name
    pub message_schemas: BTreeMap<String, Value>,
}

/// Reply to `Info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoReply {
    pub process: ProcessInfo,
    pub handlers: Vec<String>,
}
