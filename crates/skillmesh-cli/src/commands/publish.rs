//! Publish command

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use skillmesh_installer::{
    BundleManifest, Bundler, HttpStorageGateway, StorageGateway, TarGzBundler, TargetSpec,
};
use skillmesh_types::params::RegisterSkillParams;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::progress::create_spinner;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Bundle a skill directory, upload it and register the version
pub struct PublishCommand {
    dir: PathBuf,
}

impl PublishCommand {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl Command for PublishCommand {
    async fn execute(&self) -> CliResult<()> {
        let manifest = BundleManifest::load(&self.dir)?;
        // Catches bad names and non-semver versions before any bytes move.
        format!("{}@{}", manifest.name, manifest.version).parse::<TargetSpec>()?;

        let config = CliConfig::load()?;
        let client = registry_client(&config)?;
        let storage = HttpStorageGateway::new(&config.storage_url, UPLOAD_TIMEOUT)?;

        let spinner = create_spinner(&format!(
            "Publishing {}@{}",
            manifest.name, manifest.version
        ));
        let bundle = TarGzBundler.pack(&self.dir)?;
        let content_id = storage.upload(&bundle).await?;

        let params = RegisterSkillParams {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            author: manifest.author.clone(),
            tags: manifest.tags.clone(),
            dependencies: manifest.dependencies.clone(),
            content_id: content_id.clone(),
            license: manifest.license.clone(),
        };
        params
            .validate()
            .map_err(|message| CliError::InvalidArgument { message })?;

        let result = client.register_skill(&params).await;
        spinner.finish_and_clear();
        result?;

        output::print_success(&format!(
            "Published {}@{} ({})",
            manifest.name, manifest.version, content_id
        ));
        Ok(())
    }
}
