//! Lockfile pinning the exact records an install produced
//!
//! One entry per materialized skill: name, version, content id. The file is
//! schema-validated both when written and when read back, so a hand-edited
//! or truncated lockfile is rejected instead of silently trusted.

use std::fs;
use std::path::Path;

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{InstallError, Result};

/// File name of the lockfile inside the install target root
pub const LOCKFILE_NAME: &str = "skillmesh.lock";

/// Current lockfile document version
pub const LOCKFILE_VERSION: u32 = 1;

static LOCKFILE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": ["lockfileVersion", "entries"],
        "additionalProperties": false,
        "properties": {
            "lockfileVersion": { "const": LOCKFILE_VERSION },
            "entries": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "version", "contentId"],
                    "additionalProperties": false,
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "version": { "type": "string", "minLength": 1 },
                        "contentId": { "type": "string", "minLength": 1 }
                    }
                }
            }
        }
    })
});

/// One pinned skill record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileEntry {
    pub name: String,
    pub version: String,
    pub content_id: String,
}

/// The lockfile document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    pub lockfile_version: u32,
    pub entries: Vec<LockfileEntry>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self {
            lockfile_version: LOCKFILE_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Lockfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for a skill, keeping entries name-sorted
    pub fn upsert(&mut self, entry: LockfileEntry) {
        match self.entries.binary_search_by(|e| e.name.cmp(&entry.name)) {
            Ok(index) => self.entries[index] = entry,
            Err(index) => self.entries.insert(index, entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LockfileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Load and validate a lockfile; `Ok(None)` when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(InstallError::fs(path, e)),
        };
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| InstallError::Parse(format!("Lockfile is not valid JSON: {e}")))?;
        validate_document(&value)?;
        let lockfile = serde_json::from_value(value)
            .map_err(|e| InstallError::Parse(format!("Lockfile decode failed: {e}")))?;
        Ok(Some(lockfile))
    }

    /// Validate and write the lockfile
    pub fn save(&self, path: &Path) -> Result<()> {
        let value = serde_json::to_value(self)
            .map_err(|e| InstallError::Parse(format!("Lockfile encode failed: {e}")))?;
        validate_document(&value)?;
        let mut body = serde_json::to_string_pretty(&value)
            .map_err(|e| InstallError::Parse(format!("Lockfile encode failed: {e}")))?;
        body.push('\n');
        fs::write(path, body).map_err(|e| InstallError::fs(path, e))?;
        debug!(path = %path.display(), entries = self.entries.len(), "lockfile written");
        Ok(())
    }
}

fn validate_document(value: &Value) -> Result<()> {
    let compiled = JSONSchema::compile(&LOCKFILE_SCHEMA)
        .map_err(|e| InstallError::Parse(format!("Lockfile schema is invalid: {e}")))?;
    if let Err(mut errors) = compiled.validate(value) {
        if let Some(first) = errors.next() {
            return Err(InstallError::Parse(format!(
                "Lockfile does not match schema: {first}"
            )));
        }
    }
    Ok(())
}
