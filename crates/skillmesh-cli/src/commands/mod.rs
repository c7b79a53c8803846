//! Command handlers for the smesh CLI

pub mod info;
pub mod install;
pub mod list;
pub mod publish;
pub mod search;
pub mod serve;
pub mod stats;
pub mod versions;

pub use info::InfoCommand;
pub use install::InstallCommand;
pub use list::ListCommand;
pub use publish::PublishCommand;
pub use search::SearchCommand;
pub use serve::ServeCommand;
pub use stats::StatsCommand;
pub use versions::VersionsCommand;

use skillmesh_client::RegistryClient;

use crate::config::CliConfig;
use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Build a registry client from CLI configuration
pub(crate) fn registry_client(config: &CliConfig) -> CliResult<RegistryClient> {
    Ok(RegistryClient::new(config.client_config())?)
}
