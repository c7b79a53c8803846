//! Skill bundle packing and unpacking
//!
//! A bundle is a gzipped tarball of a skill directory whose root carries the
//! publisher-authored `skill.json` manifest. Unpacked bundles are verified
//! against the resolved record before anything moves into the install
//! target.

use std::fs;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tar::{Archive, Builder};

use skillmesh_types::SkillDependency;

use crate::error::{InstallError, Result};
use crate::target::MANIFEST_NAME;

/// Pack a directory into bundle bytes and back
pub trait Bundler: Send + Sync {
    fn pack(&self, dir: &Path) -> Result<Vec<u8>>;
    fn unpack(&self, bytes: &[u8], dest: &Path) -> Result<()>;
}

/// The `tar` + `gzip` bundle format the storage network carries
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzBundler;

impl Bundler for TarGzBundler {
    fn pack(&self, dir: &Path) -> Result<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);
        builder
            .append_dir_all(".", dir)
            .map_err(|e| InstallError::fs(dir, e))?;
        let encoder = builder
            .into_inner()
            .map_err(|e| InstallError::fs(dir, e))?;
        encoder
            .finish()
            .map_err(|e| InstallError::fs(dir, e))
    }

    fn unpack(&self, bytes: &[u8], dest: &Path) -> Result<()> {
        fs::create_dir_all(dest).map_err(|e| InstallError::fs(dest, e))?;
        let mut archive = Archive::new(GzDecoder::new(bytes));
        archive
            .unpack(dest)
            .map_err(|e| InstallError::Validation(format!("invalid bundle archive: {e}")))
    }
}

/// Publisher-authored manifest at the bundle root
///
/// Unknown fields are tolerated so older installers keep working as the
/// manifest grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifest {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl BundleManifest {
    /// Read the manifest from an unpacked bundle directory
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_NAME);
        let raw = fs::read_to_string(&path).map_err(|_| {
            InstallError::Validation(format!("bundle has no {MANIFEST_NAME} manifest"))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| InstallError::Validation(format!("bundle manifest is invalid: {e}")))
    }

    /// Check that the bundle is the record the resolver chose
    pub fn verify(&self, name: &str, version: &str) -> Result<()> {
        if self.name != name || self.version != version {
            return Err(InstallError::Validation(format!(
                "bundle manifest says {}@{} but {name}@{version} was expected",
                self.name, self.version
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn skill_dir(temp: &TempDir, name: &str, version: &str) -> std::path::PathBuf {
        let dir = temp.path().join(name);
        fs::create_dir_all(dir.join("scripts")).unwrap();
        fs::write(
            dir.join(MANIFEST_NAME),
            serde_json::to_string_pretty(&serde_json::json!({
                "name": name,
                "version": version,
                "description": "test skill"
            }))
            .unwrap(),
        )
        .unwrap();
        fs::write(dir.join("SKILL.md"), "# Test\n").unwrap();
        fs::write(dir.join("scripts/run.sh"), "echo hi\n").unwrap();
        dir
    }

    #[test]
    fn test_pack_then_unpack_preserves_files() {
        let temp = TempDir::new().unwrap();
        let dir = skill_dir(&temp, "web-scraper", "1.0.0");

        let bundler = TarGzBundler;
        let bytes = bundler.pack(&dir).unwrap();
        assert!(!bytes.is_empty());

        let dest = temp.path().join("unpacked");
        bundler.unpack(&bytes, &dest).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("SKILL.md")).unwrap(),
            "# Test\n"
        );
        assert_eq!(
            fs::read_to_string(dest.join("scripts/run.sh")).unwrap(),
            "echo hi\n"
        );
        assert!(dest.join(MANIFEST_NAME).exists());
    }

    #[test]
    fn test_unpack_rejects_garbage_bytes() {
        let temp = TempDir::new().unwrap();
        let bundler = TarGzBundler;
        let err = bundler
            .unpack(b"definitely not a tarball", &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, InstallError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_manifest_loads_from_unpacked_bundle() {
        let temp = TempDir::new().unwrap();
        let dir = skill_dir(&temp, "web-scraper", "1.0.0");

        let manifest = BundleManifest::load(&dir).unwrap();
        assert_eq!(manifest.name, "web-scraper");
        assert_eq!(manifest.version, "1.0.0");
        manifest.verify("web-scraper", "1.0.0").unwrap();
    }

    #[test]
    fn test_manifest_missing_is_validation_error() {
        let temp = TempDir::new().unwrap();
        let err = BundleManifest::load(temp.path()).unwrap_err();
        assert!(matches!(err, InstallError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_verify_rejects_wrong_record() {
        let temp = TempDir::new().unwrap();
        let dir = skill_dir(&temp, "web-scraper", "1.0.0");
        let manifest = BundleManifest::load(&dir).unwrap();

        let err = manifest.verify("web-scraper", "2.0.0").unwrap_err();
        assert!(matches!(err, InstallError::Validation(_)), "got {err:?}");
    }
}
