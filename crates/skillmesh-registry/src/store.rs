//! Authoritative in-memory state and the action dispatch loop
//!
//! [`RegistryStore`] owns every published [`SkillVersion`] and every
//! [`DownloadEvent`]. It is deliberately not `Sync`: exactly one task owns
//! it (see [`crate::process`]) and all mutation flows through [`handle`],
//! so writes are serialized without locks.
//!
//! [`handle`]: RegistryStore::handle

use std::collections::BTreeMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use skillmesh_types::{
    actions, AckReply, ErrorReply, GetSkillParams, ListParams, RecordDownloadParams,
    RegisterSkillParams, RegistryRequest, SearchParams, SkillReply, SkillVersion, StatsParams,
    VersionHistoryReply,
};

use crate::error::{HandlerError, Result};
use crate::{info, query, stats};

/// All published versions of one skill, in publication order
#[derive(Debug, Clone, Default)]
pub struct SkillRecord {
    versions: Vec<SkillVersion>,
}

impl SkillRecord {
    /// Most recently published version
    pub fn latest(&self) -> Option<&SkillVersion> {
        self.versions.last()
    }

    /// History ordered newest-first
    pub fn newest_first(&self) -> Vec<SkillVersion> {
        self.versions.iter().rev().cloned().collect()
    }

    pub fn versions(&self) -> &[SkillVersion] {
        &self.versions
    }
}

/// The registry's entire state
#[derive(Debug, Default)]
pub struct RegistryStore {
    skills: BTreeMap<String, SkillRecord>,
    downloads: Vec<skillmesh_types::DownloadEvent>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct skill names
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Latest version of every skill, ordered by name
    pub fn latest_versions(&self) -> Vec<&SkillVersion> {
        self.skills.values().filter_map(SkillRecord::latest).collect()
    }

    /// Latest version of one skill
    pub fn latest(&self, name: &str) -> Option<&SkillVersion> {
        self.skills.get(name).and_then(SkillRecord::latest)
    }

    /// Full record for one skill
    pub fn record(&self, name: &str) -> Option<&SkillRecord> {
        self.skills.get(name)
    }

    /// Every download event ever recorded
    pub fn downloads(&self) -> &[skillmesh_types::DownloadEvent] {
        &self.downloads
    }

    /// Dispatch a request using the wall clock for stats windows
    pub fn handle(&mut self, request: &RegistryRequest) -> Value {
        self.handle_at(request, Utc::now().timestamp_millis())
    }

    /// Dispatch a request with an explicit "now", for deterministic windows
    pub fn handle_at(&mut self, request: &RegistryRequest, now_ms: i64) -> Value {
        debug!(action = %request.action, "handling registry request");
        match self.dispatch(request, now_ms) {
            Ok(value) => value,
            Err(err) => {
                warn!(action = %request.action, error = %err, "handler failed");
                encode(&ErrorReply::new(err.to_string())).unwrap_or(Value::Null)
            }
        }
    }

    fn dispatch(&mut self, request: &RegistryRequest, now_ms: i64) -> Result<Value> {
        match request.action.as_str() {
            actions::SEARCH => {
                let params: SearchParams = decode_params(request)?;
                encode(&query::search(self, &params))
            }
            actions::LIST => {
                let params: ListParams = decode_params(request)?;
                encode(&query::list(self, &params))
            }
            actions::GET => {
                let params: GetSkillParams = decode_params(request)?;
                encode(&self.get(&params.name))
            }
            actions::GET_VERSIONS => {
                let params: GetSkillParams = decode_params(request)?;
                encode(&self.get_versions(&params.name))
            }
            actions::GET_DOWNLOAD_STATS => {
                let params: StatsParams = decode_params(request)?;
                stats::download_stats(self, &params, now_ms)
            }
            actions::INFO => encode(&info::info_reply()),
            actions::REGISTER_SKILL => {
                let params: RegisterSkillParams = decode_params(request)?;
                encode(&self.register(params, request.sender.as_deref(), now_ms)?)
            }
            actions::RECORD_DOWNLOAD => {
                let params: RecordDownloadParams = decode_params(request)?;
                encode(&self.record_download(params))
            }
            other => Err(HandlerError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }

    /// `Get`: latest version, or a not-found reply
    pub fn get(&self, name: &str) -> SkillReply {
        match self.latest(name) {
            Some(skill) => SkillReply::found(skill.clone()),
            None => SkillReply::not_found(),
        }
    }

    /// `Get-Versions`: full history newest-first with a latest marker
    pub fn get_versions(&self, name: &str) -> VersionHistoryReply {
        match self.skills.get(name) {
            Some(record) => {
                let latest = record
                    .latest()
                    .map(|v| v.version.clone())
                    .unwrap_or_default();
                VersionHistoryReply::found(record.newest_first(), latest)
            }
            None => VersionHistoryReply::not_found(),
        }
    }

    /// `Register-Skill`: append a version, or refresh an existing one
    ///
    /// `name`+`version` is the composite key. Registering a version that
    /// already exists replaces its metadata in place, keeping the original
    /// publication time; a new version is appended to the name's history.
    pub fn register(
        &mut self,
        params: RegisterSkillParams,
        sender: Option<&str>,
        now_ms: i64,
    ) -> Result<AckReply> {
        params.validate().map_err(HandlerError::Validation)?;

        let mut tags = params.tags;
        tags.sort();
        tags.dedup();

        let skill = SkillVersion {
            name: params.name.clone(),
            version: params.version,
            description: params.description,
            author: params.author,
            owner_address: sender.unwrap_or_default().to_string(),
            tags,
            dependencies: params.dependencies,
            content_id: params.content_id,
            license: params.license,
            published_at: now_ms,
            updated_at: now_ms,
        };

        let record = self.skills.entry(params.name).or_default();
        match record
            .versions
            .iter_mut()
            .find(|existing| existing.version == skill.version)
        {
            Some(existing) => {
                let published_at = existing.published_at;
                *existing = skill;
                existing.published_at = published_at;
                debug!(name = %existing.name, version = %existing.version, "refreshed existing version");
            }
            None => {
                debug!(name = %skill.name, version = %skill.version, "registered new version");
                record.versions.push(skill);
            }
        }

        Ok(AckReply::new(actions::REGISTER_SKILL))
    }

    /// `Record-Download`: append an event, no existence check
    ///
    /// Tolerant by contract: events for never-registered names are kept and
    /// only ever filtered on the read side.
    pub fn record_download(&mut self, params: RecordDownloadParams) -> AckReply {
        self.downloads.push(skillmesh_types::DownloadEvent {
            skill_name: params.name,
            version: params.version,
            requester_id: params.requester,
            timestamp: params.timestamp,
        });
        AckReply::new(actions::RECORD_DOWNLOAD)
    }
}

fn decode_params<T: DeserializeOwned>(request: &RegistryRequest) -> Result<T> {
    // An absent data block means "no parameters", same as an empty object
    let data = if request.data.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        request.data.clone()
    };
    serde_json::from_value(data).map_err(|e| HandlerError::InvalidParams {
        action: request.action.clone(),
        message: e.to_string(),
    })
}

pub(crate) fn encode<T: Serialize>(reply: &T) -> Result<Value> {
    serde_json::to_value(reply).map_err(|e| HandlerError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_request(name: &str, version: &str) -> RegistryRequest {
        RegistryRequest::new(
            actions::REGISTER_SKILL,
            json!({
                "name": name,
                "version": version,
                "description": format!("{name} description"),
                "author": "ada",
                "contentId": format!("cid-{name}-{version}"),
            }),
        )
        .with_sender("addr-ada")
    }

    #[test]
    fn test_register_and_get() {
        let mut store = RegistryStore::new();
        let ack = store.handle_at(&register_request("web-scraper", "1.0.0"), 1_000);
        assert_eq!(ack["status"], "success");

        let reply = store.handle_at(
            &RegistryRequest::new(actions::GET, json!({"name": "web-scraper"})),
            2_000,
        );
        assert_eq!(reply["status"], "success");
        assert_eq!(reply["skill"]["name"], "web-scraper");
        assert_eq!(reply["skill"]["ownerAddress"], "addr-ada");
        assert_eq!(reply["skill"]["publishedAt"], 1_000);
    }

    #[test]
    fn test_get_unknown_skill_is_in_band_not_found() {
        let mut store = RegistryStore::new();
        let reply = store.handle_at(
            &RegistryRequest::new(actions::GET, json!({"name": "missing"})),
            0,
        );
        assert_eq!(reply["status"], "error");
        assert_eq!(reply["error"], "Skill not found");
        assert!(reply.get("skill").is_none());
    }

    #[test]
    fn test_version_history_newest_first_with_latest_marker() {
        let mut store = RegistryStore::new();
        store.handle_at(&register_request("web-scraper", "1.0.0"), 1_000);
        store.handle_at(&register_request("web-scraper", "1.1.0"), 2_000);
        store.handle_at(&register_request("web-scraper", "2.0.0"), 3_000);

        let reply = store.handle_at(
            &RegistryRequest::new(actions::GET_VERSIONS, json!({"name": "web-scraper"})),
            4_000,
        );
        assert_eq!(reply["total"], 3);
        assert_eq!(reply["latest"], "2.0.0");
        assert_eq!(reply["versions"][0]["version"], "2.0.0");
        assert_eq!(reply["versions"][2]["version"], "1.0.0");
    }

    #[test]
    fn test_reregistering_same_version_updates_in_place() {
        let mut store = RegistryStore::new();
        store.handle_at(&register_request("web-scraper", "1.0.0"), 1_000);

        let refreshed = RegistryRequest::new(
            actions::REGISTER_SKILL,
            json!({
                "name": "web-scraper",
                "version": "1.0.0",
                "description": "updated description",
                "author": "ada",
                "contentId": "cid-new",
            }),
        );
        store.handle_at(&refreshed, 5_000);

        let record = store.record("web-scraper").unwrap();
        assert_eq!(record.versions().len(), 1);
        let skill = record.latest().unwrap();
        assert_eq!(skill.description, "updated description");
        assert_eq!(skill.content_id, "cid-new");
        assert_eq!(skill.published_at, 1_000);
        assert_eq!(skill.updated_at, 5_000);
    }

    #[test]
    fn test_register_rejects_invalid_version() {
        let mut store = RegistryStore::new();
        let reply = store.handle_at(
            &RegistryRequest::new(
                actions::REGISTER_SKILL,
                json!({
                    "name": "web-scraper",
                    "version": "one-point-oh",
                    "contentId": "cid-1",
                }),
            ),
            0,
        );
        assert_eq!(reply["status"], "error");
        assert!(reply["error"].as_str().unwrap().contains("semver"));
        assert_eq!(store.skill_count(), 0);
    }

    #[test]
    fn test_record_download_is_tolerant_of_unknown_names() {
        let mut store = RegistryStore::new();
        let reply = store.handle_at(
            &RegistryRequest::new(
                actions::RECORD_DOWNLOAD,
                json!({
                    "name": "never-registered",
                    "version": "1.0.0",
                    "requester": "addr-bob",
                    "timestamp": 123,
                }),
            ),
            0,
        );
        assert_eq!(reply["status"], "success");
        assert_eq!(store.downloads().len(), 1);
    }

    #[test]
    fn test_unknown_action_reports_error_reply() {
        let mut store = RegistryStore::new();
        let reply = store.handle_at(&RegistryRequest::new("Destroy-All", json!({})), 0);
        assert_eq!(reply["status"], "error");
        assert!(reply["error"].as_str().unwrap().contains("Destroy-All"));
    }

    #[test]
    fn test_missing_data_block_means_no_parameters() {
        let mut store = RegistryStore::new();
        let request = RegistryRequest {
            action: actions::LIST.to_string(),
            data: Value::Null,
            sender: None,
        };
        let reply = store.handle_at(&request, 0);
        assert_eq!(reply["pagination"]["total"], 0);
    }

    #[test]
    fn test_register_deduplicates_tags() {
        let mut store = RegistryStore::new();
        store.handle_at(
            &RegistryRequest::new(
                actions::REGISTER_SKILL,
                json!({
                    "name": "web-scraper",
                    "version": "1.0.0",
                    "contentId": "cid-1",
                    "tags": ["web", "scraping", "web"],
                }),
            ),
            0,
        );
        let skill = store.latest("web-scraper").unwrap();
        assert_eq!(skill.tags, vec!["scraping".to_string(), "web".to_string()]);
    }
}
