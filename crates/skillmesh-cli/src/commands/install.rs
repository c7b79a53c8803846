//! Install command

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use skillmesh_installer::{
    render_tree, HttpStorageGateway, InstallOptions, InstallTarget, Installer, TarGzBundler,
    TargetSpec,
};
use skillmesh_types::params::RecordDownloadParams;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, OutputStyle};
use crate::progress::create_spinner;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve a skill spec and materialize it plus its dependencies
pub struct InstallCommand {
    spec: String,
    target: Option<PathBuf>,
    force: bool,
    tree: bool,
}

impl InstallCommand {
    pub fn new(spec: String) -> Self {
        Self {
            spec,
            target: None,
            force: false,
            tree: false,
        }
    }

    pub fn with_target(mut self, target: Option<PathBuf>) -> Self {
        self.target = target;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_tree(mut self, tree: bool) -> Self {
        self.tree = tree;
        self
    }
}

#[async_trait]
impl Command for InstallCommand {
    async fn execute(&self) -> CliResult<()> {
        let spec: TargetSpec = self.spec.parse()?;
        let config = CliConfig::load()?;

        let client = Arc::new(registry_client(&config)?);
        let storage = Arc::new(HttpStorageGateway::new(
            &config.storage_url,
            DOWNLOAD_TIMEOUT,
        )?);
        let target_root = self
            .target
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.target_dir));
        let installer = Installer::new(
            client.clone(),
            storage,
            Arc::new(TarGzBundler),
            InstallTarget::new(&target_root),
        );

        let cancel = CancellationToken::new();
        let ctrl_c_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c_cancel.cancel();
            }
        });
        let installer = installer.with_cancellation(cancel);

        let spinner = create_spinner(&format!("Installing {}", spec));
        let result = installer
            .install(
                &spec,
                InstallOptions {
                    force: self.force,
                },
            )
            .await;
        spinner.finish_and_clear();
        let report = result?;

        let style = OutputStyle::default();
        if self.tree {
            print!("{}", render_tree(&report.graph));
        }
        for name in &report.skipped {
            println!("{}", style.detail(&format!("{} already installed", name)));
        }
        if report.installed.is_empty() {
            output::print_info(&format!(
                "{} is already up to date in {}",
                spec,
                target_root.display()
            ));
        } else {
            output::print_success(&format!(
                "Installed {} skill(s) into {}",
                report.installed.len(),
                target_root.display()
            ));
        }

        // Download accounting is best effort; a miss never fails the install.
        let root = report.graph.root();
        let record = RecordDownloadParams {
            name: root.name.clone(),
            version: root.version.clone(),
            requester: config.requester_id.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        if let Err(e) = client.record_download(&record).await {
            warn!(error = %e, "failed to record download");
        }

        Ok(())
    }
}
