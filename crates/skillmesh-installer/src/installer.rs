//! Install orchestration
//!
//! Resolve, order, materialize, lock. Artifacts land one at a time in
//! dependency-before-dependent order; the lockfile is written exactly once,
//! after the whole plan has materialized. A cancelled run stops issuing
//! calls, keeps whatever is already on disk, and leaves the lockfile
//! untouched.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use skillmesh_client::RegistryClient;

use crate::bundle::{BundleManifest, Bundler};
use crate::error::{InstallError, Result};
use crate::lockfile::{Lockfile, LockfileEntry};
use crate::plan::install_order;
use crate::resolver::{DependencyNode, ResolvedGraph, Resolver};
use crate::spec::TargetSpec;
use crate::storage::StorageGateway;
use crate::target::{InstallTarget, InstalledManifest};

/// Knobs for a single install run
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Materialize even records the target already holds
    pub force: bool,
}

/// What an install run did
#[derive(Debug)]
pub struct InstallReport {
    pub graph: ResolvedGraph,
    /// Arena indices in materialization order
    pub plan: Vec<usize>,
    /// Skills fetched and placed this run
    pub installed: Vec<String>,
    /// Skills left alone because the exact record was already present
    pub skipped: Vec<String>,
}

/// Materializes resolved skill graphs into an install target
pub struct Installer {
    client: Arc<RegistryClient>,
    storage: Arc<dyn StorageGateway>,
    bundler: Arc<dyn Bundler>,
    target: InstallTarget,
    cancel: CancellationToken,
}

impl Installer {
    pub fn new(
        client: Arc<RegistryClient>,
        storage: Arc<dyn StorageGateway>,
        bundler: Arc<dyn Bundler>,
        target: InstallTarget,
    ) -> Self {
        Self {
            client,
            storage,
            bundler,
            target,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn target(&self) -> &InstallTarget {
        &self.target
    }

    /// Resolve `spec` and materialize everything it needs
    pub async fn install(
        &self,
        spec: &TargetSpec,
        options: InstallOptions,
    ) -> Result<InstallReport> {
        // A corrupt lockfile fails the run before any network work
        let lockfile_path = self.target.lockfile_path();
        let mut lockfile = Lockfile::load(&lockfile_path)?.unwrap_or_default();

        let resolver = Resolver::new(self.client.as_ref(), &self.target)
            .with_cancellation(self.cancel.clone());
        let graph = resolver.resolve(spec).await?;
        let plan = install_order(&graph);
        debug!(skill = %spec, nodes = graph.len(), "install plan ready");

        let mut installed = Vec::new();
        let mut skipped = Vec::new();

        for &index in &plan {
            let node = graph.node(index);
            if node.is_installed && !options.force {
                debug!(name = %node.name, version = %node.version, "already installed, skipping");
                skipped.push(node.name.clone());
                continue;
            }
            if self.cancel.is_cancelled() {
                return Err(InstallError::UserCancelled);
            }
            self.materialize(node).await?;
            installed.push(node.name.clone());
        }

        for &index in &plan {
            let node = graph.node(index);
            lockfile.upsert(LockfileEntry {
                name: node.name.clone(),
                version: node.version.clone(),
                content_id: node.content_id.clone(),
            });
        }
        lockfile.save(&lockfile_path)?;

        info!(
            skill = %spec,
            installed = installed.len(),
            skipped = skipped.len(),
            "install complete"
        );
        Ok(InstallReport {
            graph,
            plan,
            installed,
            skipped,
        })
    }

    async fn materialize(&self, node: &DependencyNode) -> Result<()> {
        let bytes = self.storage.download(&node.content_id).await?;
        if self.cancel.is_cancelled() {
            return Err(InstallError::UserCancelled);
        }

        let staging = tempfile::tempdir().map_err(|e| InstallError::fs(std::env::temp_dir(), e))?;
        self.bundler.unpack(&bytes, staging.path())?;

        let manifest = BundleManifest::load(staging.path())?;
        manifest.verify(&node.name, &node.version)?;

        self.target.place(
            &InstalledManifest {
                name: node.name.clone(),
                version: node.version.clone(),
                content_id: node.content_id.clone(),
            },
            staging.path(),
        )?;
        info!(name = %node.name, version = %node.version, "installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use serde_json::Value;
    use tempfile::TempDir;

    use skillmesh_client::error::TransportError;
    use skillmesh_client::{RetryPolicy, Transport};
    use skillmesh_types::reply::VersionHistoryReply;
    use skillmesh_types::{actions, RegistryRequest, SkillDependency, SkillVersion};

    use crate::bundle::TarGzBundler;
    use crate::storage::MemoryStorageGateway;

    struct StubRegistry {
        histories: BTreeMap<String, Vec<SkillVersion>>,
    }

    #[async_trait]
    impl Transport for StubRegistry {
        async fn query(
            &self,
            request: &RegistryRequest,
        ) -> std::result::Result<Value, TransportError> {
            assert_eq!(request.action, actions::GET_VERSIONS);
            let name = request.data["name"].as_str().unwrap_or_default();
            let reply = match self.histories.get(name) {
                Some(versions) => {
                    let latest = versions[0].version.clone();
                    VersionHistoryReply::found(versions.clone(), latest)
                }
                None => VersionHistoryReply::not_found(),
            };
            serde_json::to_value(reply).map_err(|e| TransportError::Parse(e.to_string()))
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    struct Harness {
        _temp: TempDir,
        storage: Arc<MemoryStorageGateway>,
        histories: BTreeMap<String, Vec<SkillVersion>>,
        target_root: std::path::PathBuf,
        bundle_dir: std::path::PathBuf,
    }

    impl Harness {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let target_root = temp.path().join("skills");
            let bundle_dir = temp.path().join("bundles");
            std::fs::create_dir_all(&bundle_dir).unwrap();
            Self {
                _temp: temp,
                storage: Arc::new(MemoryStorageGateway::new()),
                histories: BTreeMap::new(),
                target_root,
                bundle_dir,
            }
        }

        /// Pack and upload a bundle, then register a matching version record
        async fn publish(&mut self, name: &str, version: &str, deps: &[(&str, &str)]) {
            let dir = self.bundle_dir.join(format!("{name}-{version}"));
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join(crate::target::MANIFEST_NAME),
                serde_json::to_string_pretty(&serde_json::json!({
                    "name": name,
                    "version": version,
                    "description": format!("{name} skill"),
                }))
                .unwrap(),
            )
            .unwrap();
            std::fs::write(dir.join("SKILL.md"), format!("# {name}\n")).unwrap();

            let bytes = TarGzBundler.pack(&dir).unwrap();
            let content_id = self.storage.upload(&bytes).await.unwrap();

            let record = SkillVersion {
                name: name.to_string(),
                version: version.to_string(),
                description: format!("{name} skill"),
                author: "tester".to_string(),
                owner_address: String::new(),
                tags: Vec::new(),
                dependencies: deps
                    .iter()
                    .map(|(n, c)| SkillDependency::new(*n, *c))
                    .collect(),
                content_id,
                license: None,
                published_at: 1_700_000_000_000,
                updated_at: 1_700_000_000_000,
            };
            self.histories
                .entry(name.to_string())
                .or_default()
                .insert(0, record);
        }

        fn installer(&self) -> Installer {
            let transport = Arc::new(StubRegistry {
                histories: self.histories.clone(),
            });
            let client = Arc::new(RegistryClient::with_transports(
                transport.clone(),
                transport,
                RetryPolicy::default(),
            ));
            Installer::new(
                client,
                self.storage.clone(),
                Arc::new(TarGzBundler),
                InstallTarget::new(&self.target_root),
            )
        }
    }

    #[tokio::test]
    async fn test_install_materializes_skill_and_lockfile() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;

        let installer = harness.installer();
        let report = installer
            .install(&TargetSpec::new("web-scraper"), InstallOptions::default())
            .await
            .unwrap();

        assert_eq!(report.installed, vec!["web-scraper"]);
        assert!(report.skipped.is_empty());
        assert!(harness.target_root.join("web-scraper/SKILL.md").exists());

        let lockfile = Lockfile::load(&installer.target().lockfile_path())
            .unwrap()
            .unwrap();
        let entry = lockfile.get("web-scraper").unwrap();
        assert_eq!(entry.version, "1.0.0");
        assert!(!entry.content_id.is_empty());
    }

    #[tokio::test]
    async fn test_second_install_skips_everything() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;

        let installer = harness.installer();
        let spec = TargetSpec::new("web-scraper");
        installer
            .install(&spec, InstallOptions::default())
            .await
            .unwrap();

        let report = installer
            .install(&spec, InstallOptions::default())
            .await
            .unwrap();
        assert!(report.installed.is_empty());
        assert_eq!(report.skipped, vec!["web-scraper"]);
    }

    #[tokio::test]
    async fn test_force_reinstalls_present_records() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;

        let installer = harness.installer();
        let spec = TargetSpec::new("web-scraper");
        installer
            .install(&spec, InstallOptions::default())
            .await
            .unwrap();

        let report = installer
            .install(&spec, InstallOptions { force: true })
            .await
            .unwrap();
        assert_eq!(report.installed, vec!["web-scraper"]);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_diamond_installs_dependencies_first_and_once() {
        let mut harness = Harness::new();
        harness.publish("base", "1.0.0", &[]).await;
        harness.publish("left", "1.0.0", &[("base", "")]).await;
        harness.publish("right", "1.0.0", &[("base", "")]).await;
        harness
            .publish("app", "1.0.0", &[("left", ""), ("right", "")])
            .await;

        let installer = harness.installer();
        let report = installer
            .install(&TargetSpec::new("app"), InstallOptions::default())
            .await
            .unwrap();

        assert_eq!(report.installed.len(), 4);
        assert_eq!(
            report.installed.iter().filter(|n| *n == "base").count(),
            1
        );
        let position =
            |name: &str| report.installed.iter().position(|n| n == name).unwrap();
        assert!(position("base") < position("left"));
        assert!(position("left") < position("app"));
        assert!(position("right") < position("app"));

        let lockfile = Lockfile::load(&installer.target().lockfile_path())
            .unwrap()
            .unwrap();
        assert_eq!(lockfile.entries.len(), 4);
    }

    #[tokio::test]
    async fn test_bundle_record_mismatch_aborts_without_lockfile() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;
        // Registry claims 2.0.0 but the stored bundle still says 1.0.0
        let history = harness.histories.get_mut("web-scraper").unwrap();
        history[0].version = "2.0.0".to_string();

        let installer = harness.installer();
        let err = installer
            .install(&TargetSpec::new("web-scraper"), InstallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::Validation(_)), "got {err:?}");
        assert!(!installer.target().lockfile_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_lockfile_fails_before_any_work() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;

        std::fs::create_dir_all(&harness.target_root).unwrap();
        let installer = harness.installer();
        std::fs::write(installer.target().lockfile_path(), "{ broken").unwrap();

        let err = installer
            .install(&TargetSpec::new("web-scraper"), InstallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::Parse(_)), "got {err:?}");
        assert!(!harness.target_root.join("web-scraper").exists());
    }

    #[tokio::test]
    async fn test_cancelled_run_writes_no_lockfile() {
        let mut harness = Harness::new();
        harness.publish("web-scraper", "1.0.0", &[]).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let installer = harness.installer().with_cancellation(cancel);

        let err = installer
            .install(&TargetSpec::new("web-scraper"), InstallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::UserCancelled), "got {err:?}");
        assert!(!installer.target().lockfile_path().exists());
    }
}
