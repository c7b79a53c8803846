//! Search command

use async_trait::async_trait;

use skillmesh_types::SearchParams;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Search the registry for skills
pub struct SearchCommand {
    query: String,
    limit: Option<u64>,
}

impl SearchCommand {
    pub fn new(query: String, limit: Option<u64>) -> Self {
        Self { query, limit }
    }
}

#[async_trait]
impl Command for SearchCommand {
    async fn execute(&self) -> CliResult<()> {
        let config = CliConfig::load()?;
        let client = registry_client(&config)?;

        let params = SearchParams {
            query: self.query.clone(),
            limit: self.limit,
        };
        let reply = client.search_with(&params).await?;

        let style = OutputStyle::default();
        if reply.results.is_empty() {
            println!(
                "{}",
                style.info(&format!("No skills match '{}'", reply.query))
            );
            return Ok(());
        }

        let heading = if reply.query.trim().is_empty() {
            format!("{} of {} skill(s)", reply.results.len(), reply.total)
        } else {
            format!(
                "{} of {} match(es) for '{}'",
                reply.results.len(),
                reply.total,
                reply.query
            )
        };
        println!("{}", style.header(&heading));
        for skill in &reply.results {
            println!(
                "{}",
                style.list_item(&format!(
                    "{}@{}  {}",
                    skill.name, skill.version, skill.description
                ))
            );
        }
        Ok(())
    }
}
