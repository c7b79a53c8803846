//! The install target: a local directory of unpacked skills
//!
//! Layout is one subdirectory per skill, each carrying a `skill.json`
//! manifest recording what exactly is materialized there. The manifest is
//! the install-state probe: a skill counts as installed only when name,
//! version, and content id all match the resolved record.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::lockfile::LOCKFILE_NAME;

/// Per-skill manifest file name
pub const MANIFEST_NAME: &str = "skill.json";

/// What `skill.json` records about a materialized skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledManifest {
    pub name: String,
    pub version: String,
    pub content_id: String,
}

/// A directory receiving installed skills
#[derive(Debug, Clone)]
pub struct InstallTarget {
    root: PathBuf,
}

impl InstallTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.skill_dir(name).join(MANIFEST_NAME)
    }

    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_NAME)
    }

    /// Read a skill's manifest; `None` when absent or unreadable
    pub fn installed_manifest(&self, name: &str) -> Option<InstalledManifest> {
        let raw = fs::read_to_string(self.manifest_path(name)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Whether this exact record is already materialized here
    pub fn is_installed(&self, name: &str, version: &str, content_id: &str) -> bool {
        match self.installed_manifest(name) {
            Some(manifest) => {
                manifest.name == name
                    && manifest.version == version
                    && manifest.content_id == content_id
            }
            None => false,
        }
    }

    /// Move a staged, verified skill into place and stamp its manifest
    ///
    /// Any previous contents of the skill directory are replaced wholesale.
    pub fn place(&self, manifest: &InstalledManifest, staged: &Path) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| InstallError::fs(&self.root, e))?;

        let dir = self.skill_dir(&manifest.name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| InstallError::fs(&dir, e))?;
        }

        // A rename only works within one filesystem; staging usually lives
        // elsewhere, so fall back to a recursive copy
        if fs::rename(staged, &dir).is_err() {
            copy_dir_all(staged, &dir).map_err(|e| InstallError::fs(&dir, e))?;
        }

        let manifest_path = dir.join(MANIFEST_NAME);
        let body = serde_json::to_string_pretty(manifest)
            .map_err(|e| InstallError::Parse(e.to_string()))?;
        fs::write(&manifest_path, body).map_err(|e| InstallError::fs(&manifest_path, e))?;

        debug!(name = %manifest.name, version = %manifest.version, dir = %dir.display(), "skill materialized");
        Ok(())
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}
