//! Self-describing capability metadata for the `Info` handler

use std::collections::BTreeMap;

use serde_json::{json, Value};

use skillmesh_types::{actions, InfoReply, ProcessInfo};

/// Version tag of the message protocol, bumped on breaking wire changes
pub const PROTOCOL_VERSION: &str = "1.0";

/// Build the full `Info` reply: identity, handler list, and per-handler
/// input schemas so a client can introspect the registry over the wire.
pub fn info_reply() -> InfoReply {
    InfoReply {
        process: ProcessInfo {
            name: "skillmesh-registry".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: vec![
                "skills".to_string(),
                "download-stats".to_string(),
                "introspection".to_string(),
            ],
            message_schemas: message_schemas(),
        },
        handlers: actions::ALL.iter().map(ToString::to_string).collect(),
    }
}

fn message_schemas() -> BTreeMap<String, Value> {
    let mut schemas = BTreeMap::new();
    schemas.insert(
        actions::SEARCH.to_string(),
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "minimum": 1}
            },
            "required": ["query"]
        }),
    );
    schemas.insert(
        actions::LIST.to_string(),
        json!({
            "type": "object",
            "properties": {
                "limit": {"type": "integer", "minimum": 1, "maximum": 100},
                "offset": {"type": "integer", "minimum": 0},
                "author": {"type": "string"},
                "filterTags": {"type": "array", "items": {"type": "string"}},
                "filterName": {"type": "string"}
            }
        }),
    );
    schemas.insert(
        actions::GET.to_string(),
        json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        }),
    );
    schemas.insert(
        actions::GET_VERSIONS.to_string(),
        json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        }),
    );
    schemas.insert(
        actions::GET_DOWNLOAD_STATS.to_string(),
        json!({
            "type": "object",
            "properties": {
                "scope": {"type": "string", "enum": ["all", "skill"]},
                "name": {"type": "string"},
                "timeRange": {"type": "string", "enum": ["7", "30", "all"]}
            }
        }),
    );
    schemas.insert(actions::INFO.to_string(), json!({"type": "object"}));
    schemas.insert(
        actions::REGISTER_SKILL.to_string(),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "minLength": 1, "maxLength": 64},
                "version": {"type": "string"},
                "description": {"type": "string"},
                "author": {"type": "string"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "dependencies": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "versionConstraint": {"type": "string"}
                        },
                        "required": ["name"]
                    }
                },
                "contentId": {"type": "string", "minLength": 1},
                "license": {"type": "string"}
            },
            "required": ["name", "version", "contentId"]
        }),
    );
    schemas.insert(
        actions::RECORD_DOWNLOAD.to_string(),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "version": {"type": "string"},
                "requester": {"type": "string"},
                "timestamp": {"type": "integer"}
            },
            "required": ["name", "timestamp"]
        }),
    );
    schemas
}
