//! Skill records as stored by the registry and returned over the wire

use serde::{Deserialize, Serialize};

/// Maximum accepted length for a skill name
pub const MAX_NAME_LEN: usize = 64;

/// One published version of a skill
///
/// Immutable once published: re-registering the same `name`+`version` pair
/// updates the record in place (bumping `updated_at`), while a new version of
/// an existing name appends to that name's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillVersion {
    /// Skill name, unique across the registry
    pub name: String,
    /// Semver version string
    pub version: String,
    /// Human-readable description
    pub description: String,
    /// Author display name
    pub author: String,
    /// Publisher address on the mesh
    pub owner_address: String,
    /// Categorization tags (deduplicated, set semantics)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Direct dependencies with version constraints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SkillDependency>,
    /// Content identifier of the bundle on the storage network
    pub content_id: String,
    /// SPDX license identifier, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Publication time, epoch milliseconds
    pub published_at: i64,
    /// Last metadata update, epoch milliseconds
    pub updated_at: i64,
}

/// A dependency on another skill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillDependency {
    /// Name of the required skill
    pub name: String,
    /// Semver requirement; empty, `*`, or `latest` mean "newest published"
    #[serde(default)]
    pub version_constraint: String,
}

impl SkillDependency {
    /// Create a dependency on a skill with a version constraint
    pub fn new(name: impl Into<String>, version_constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_constraint: version_constraint.into(),
        }
    }
}

/// Check whether a skill name is well-formed
///
/// Names are 1-64 characters of lowercase ASCII letters, digits, `.`, `_`,
/// and `-`, and must start with a letter or digit.
pub fn is_valid_skill_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_skill_name("web-search"));
        assert!(is_valid_skill_name("pdf.reader"));
        assert!(is_valid_skill_name("skill_2"));
        assert!(is_valid_skill_name("a"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_skill_name(""));
        assert!(!is_valid_skill_name("-leading-dash"));
        assert!(!is_valid_skill_name(".hidden"));
        assert!(!is_valid_skill_name("Upper"));
        assert!(!is_valid_skill_name("has space"));
        assert!(!is_valid_skill_name(&"x".repeat(MAX_NAME_LEN + 1)));
    }

    #[test]
    fn test_skill_version_wire_names() {
        let skill = SkillVersion {
            name: "web-search".to_string(),
            version: "1.2.0".to_string(),
            description: "Search the web".to_string(),
            author: "ada".to_string(),
            owner_address: "addr-1".to_string(),
            tags: vec!["search".to_string()],
            dependencies: vec![SkillDependency::new("http-fetch", "^2")],
            content_id: "cid-abc".to_string(),
            license: None,
            published_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&skill).unwrap();
        assert_eq!(json["ownerAddress"], "addr-1");
        assert_eq!(json["contentId"], "cid-abc");
        assert_eq!(json["publishedAt"], 1_700_000_000_000i64);
        assert_eq!(json["dependencies"][0]["versionConstraint"], "^2");
        // license is omitted, not null
        assert!(json.get("license").is_none());
    }
}
