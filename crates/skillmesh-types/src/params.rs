//! Typed parameter objects for registry actions
//!
//! These mirror the JSON `data` payload of each [`crate::RegistryRequest`].
//! Handlers deserialize into these instead of poking at raw `Value`s, so
//! unknown fields are tolerated and missing optional fields get defaults.

use serde::{Deserialize, Serialize};

use crate::skill::{is_valid_skill_name, SkillDependency};

/// Parameters for `Get` and `Get-Versions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSkillParams {
    pub name: String,
}

/// Parameters for `List`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Page size, clamped server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of entries to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Keep only skills by this author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Keep only skills carrying every one of these tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_tags: Option<Vec<String>>,
    /// Keep only skills whose name contains this substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
}

/// Parameters for `Search`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Parameters for `Get-Download-Stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    /// `"skill"` for a single skill, anything else (or absent) for aggregate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Skill name, required when `scope` is `"skill"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `"7"`, `"30"` or `"all"`; defaults to all time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
}

/// Parameters for `Register-Skill`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSkillParams {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SkillDependency>,
    /// Content address of the published bundle
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl RegisterSkillParams {
    /// Check the fields a registration must carry before it is accepted
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_skill_name(&self.name) {
            return Err(format!("Invalid skill name: {}", self.name));
        }
        if semver::Version::parse(&self.version).is_err() {
            return Err(format!("Invalid semver version: {}", self.version));
        }
        if self.content_id.trim().is_empty() {
            return Err("contentId must not be empty".to_string());
        }
        for dep in &self.dependencies {
            if !is_valid_skill_name(&dep.name) {
                return Err(format!("Invalid dependency name: {}", dep.name));
            }
        }
        Ok(())
    }
}

/// Parameters for `Record-Download`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDownloadParams {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub requester: String,
    /// Client-supplied event time in epoch milliseconds
    pub timestamp: i64,
}
