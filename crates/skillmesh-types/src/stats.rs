//! Download statistics payloads
//!
//! Which count fields a stats reply carries depends on the requested
//! window: a 7-day query answers with only the 7-day count, a 30-day
//! query with only the 30-day count, and an all-time query with the
//! total plus both windows. The enums below encode each shape as its
//! own variant so an absent field is unrepresentable rather than a
//! zero default.
//!
//! Untagged deserialization tries variants top to bottom, so the
//! all-time shape must stay first: it is the only one that demands
//! every field, and the narrower shapes would otherwise swallow it.

use serde::{Deserialize, Serialize};

pub const WINDOW_7_DAYS_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const WINDOW_30_DAYS_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Aggregation window selected by the `timeRange` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Days7,
    Days30,
    All,
}

impl TimeRange {
    /// Parse the wire value; `None` for anything unrecognized
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "7" => Some(Self::Days7),
            "30" => Some(Self::Days30),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days7 => "7",
            Self::Days30 => "30",
            Self::All => "all",
        }
    }

    /// Window width in milliseconds; `None` means unbounded
    pub fn window_ms(&self) -> Option<i64> {
        match self {
            Self::Days7 => Some(WINDOW_7_DAYS_MS),
            Self::Days30 => Some(WINDOW_30_DAYS_MS),
            Self::All => None,
        }
    }
}

/// Registry-wide download counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateStats {
    #[serde(rename_all = "camelCase")]
    All {
        total_skills: u64,
        downloads_total: u64,
        downloads_7_days: u64,
        downloads_30_days: u64,
    },
    #[serde(rename_all = "camelCase")]
    Days30 {
        total_skills: u64,
        downloads_30_days: u64,
    },
    #[serde(rename_all = "camelCase")]
    Days7 {
        total_skills: u64,
        downloads_7_days: u64,
    },
}

impl AggregateStats {
    pub fn total_skills(&self) -> u64 {
        match self {
            Self::All { total_skills, .. }
            | Self::Days30 { total_skills, .. }
            | Self::Days7 { total_skills, .. } => *total_skills,
        }
    }
}

/// Download counts for a single skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillStats {
    #[serde(rename_all = "camelCase")]
    All {
        skill_name: String,
        version: String,
        downloads_total: u64,
        downloads_7_days: u64,
        downloads_30_days: u64,
    },
    #[serde(rename_all = "camelCase")]
    Days30 {
        skill_name: String,
        version: String,
        downloads_30_days: u64,
    },
    #[serde(rename_all = "camelCase")]
    Days7 {
        skill_name: String,
        version: String,
        downloads_7_days: u64,
    },
}

impl SkillStats {
    pub fn skill_name(&self) -> &str {
        match self {
            Self::All { skill_name, .. }
            | Self::Days30 { skill_name, .. }
            | Self::Days7 { skill_name, .. } => skill_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_range_parse() {
        assert_eq!(TimeRange::parse("7"), Some(TimeRange::Days7));
        assert_eq!(TimeRange::parse("30"), Some(TimeRange::Days30));
        assert_eq!(TimeRange::parse("all"), Some(TimeRange::All));
        assert_eq!(TimeRange::parse("90"), None);
        assert_eq!(TimeRange::parse(""), None);
    }

    #[test]
    fn test_seven_day_shape_has_no_thirty_day_field() {
        let stats = AggregateStats::Days7 {
            total_skills: 2,
            downloads_7_days: 5,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["downloads7Days"], 5);
        assert!(value.get("downloads30Days").is_none());
        assert!(value.get("downloadsTotal").is_none());
    }

    #[test]
    fn test_all_time_shape_carries_every_field() {
        let value = json!({
            "totalSkills": 2,
            "downloadsTotal": 5,
            "downloads7Days": 2,
            "downloads30Days": 4
        });
        let stats: AggregateStats = serde_json::from_value(value).unwrap();
        assert_eq!(
            stats,
            AggregateStats::All {
                total_skills: 2,
                downloads_total: 5,
                downloads_7_days: 2,
                downloads_30_days: 4,
            }
        );
    }

    #[test]
    fn test_windowed_payload_decodes_to_windowed_variant() {
        let value = json!({"totalSkills": 1, "downloads30Days": 3});
        let stats: AggregateStats = serde_json::from_value(value).unwrap();
        assert_eq!(
            stats,
            AggregateStats::Days30 {
                total_skills: 1,
                downloads_30_days: 3,
            }
        );
    }

    #[test]
    fn test_skill_stats_wire_names() {
        let stats = SkillStats::All {
            skill_name: "web-scraper".to_string(),
            version: "1.2.0".to_string(),
            downloads_total: 4,
            downloads_7_days: 2,
            downloads_30_days: 3,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["skillName"], "web-scraper");
        assert_eq!(value["downloadsTotal"], 4);
    }
}
