//! CLI configuration: file plus environment overrides
//!
//! Read order: built-in defaults, then `~/.skillmesh/config.json` if
//! present, then `SKILLMESH_*` environment variables. Environment always
//! wins, so scripts can point one-off commands at another mesh.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use skillmesh_client::ClientConfig;

use crate::error::{CliError, CliResult};

/// Settings the `smesh` commands run with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliConfig {
    /// Compute gateway serving dry-run reads
    pub gateway_url: String,
    /// Messenger serving signed writes and fallback reads
    pub messenger_url: String,
    /// Storage gateway serving bundle bytes
    pub storage_url: String,
    /// Process id of the registry on the mesh
    pub process_id: String,
    /// Directory skills install into
    pub target_dir: PathBuf,
    /// Requester id stamped on download events
    pub requester_id: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:4000".to_string(),
            messenger_url: "http://localhost:4010".to_string(),
            storage_url: "http://localhost:4020".to_string(),
            process_id: "registry".to_string(),
            target_dir: PathBuf::from("./skills"),
            requester_id: "smesh-cli".to_string(),
        }
    }
}

impl CliConfig {
    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillmesh").join("config.json"))
    }

    /// Load defaults, file, then environment
    pub fn load() -> CliResult<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit file; missing fields fall back to defaults
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("SKILLMESH_GATEWAY_URL") {
            self.gateway_url = v;
        }
        if let Ok(v) = env::var("SKILLMESH_MESSENGER_URL") {
            self.messenger_url = v;
        }
        if let Ok(v) = env::var("SKILLMESH_STORAGE_URL") {
            self.storage_url = v;
        }
        if let Ok(v) = env::var("SKILLMESH_PROCESS_ID") {
            self.process_id = v;
        }
        if let Ok(v) = env::var("SKILLMESH_TARGET_DIR") {
            self.target_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SKILLMESH_REQUESTER_ID") {
            self.requester_id = v;
        }
    }

    /// Client settings derived from this configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_gateway_url(self.gateway_url.clone())
            .with_messenger_url(self.messenger_url.clone())
            .with_process_id(self.process_id.clone())
    }
}
