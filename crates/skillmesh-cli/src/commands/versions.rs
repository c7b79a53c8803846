//! Versions command

use async_trait::async_trait;
use chrono::DateTime;

use skillmesh_types::reply::STATUS_ERROR;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Show a skill's published versions, newest first
pub struct VersionsCommand {
    name: String,
}

impl VersionsCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Command for VersionsCommand {
    async fn execute(&self) -> CliResult<()> {
        let config = CliConfig::load()?;
        let client = registry_client(&config)?;

        let reply = client.get_versions(&self.name).await?;
        if reply.status == STATUS_ERROR {
            return Err(CliError::Registry(
                reply.error.unwrap_or_else(|| "Skill not found".to_string()),
            ));
        }

        let style = OutputStyle::default();
        println!(
            "{}",
            style.header(&format!(
                "{} version(s) of {}",
                reply.total, self.name
            ))
        );
        for skill in &reply.versions {
            let mut line = format!("{}  published {}", skill.version, date(skill.published_at));
            if reply.latest.as_deref() == Some(skill.version.as_str()) {
                line.push_str("  (latest)");
            }
            println!("{}", style.list_item(&line));
        }
        Ok(())
    }
}

fn date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
