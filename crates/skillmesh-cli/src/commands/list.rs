//! List command

use async_trait::async_trait;

use skillmesh_types::ListParams;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// List registered skills with pagination and filters
pub struct ListCommand {
    limit: Option<u64>,
    offset: Option<u64>,
    author: Option<String>,
    tags: Vec<String>,
    name: Option<String>,
}

impl ListCommand {
    pub fn new(
        limit: Option<u64>,
        offset: Option<u64>,
        author: Option<String>,
        tags: Vec<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            limit,
            offset,
            author,
            tags,
            name,
        }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self) -> CliResult<()> {
        let config = CliConfig::load()?;
        let client = registry_client(&config)?;

        let params = ListParams {
            limit: self.limit,
            offset: self.offset,
            author: self.author.clone(),
            filter_tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            filter_name: self.name.clone(),
        };
        let reply = client.list(&params).await?;

        let style = OutputStyle::default();
        let page = &reply.pagination;
        if reply.skills.is_empty() {
            println!("{}", style.info("No skills on this page"));
            return Ok(());
        }

        for skill in &reply.skills {
            let mut line = format!("{}@{}  {}", skill.name, skill.version, skill.description);
            if !skill.tags.is_empty() {
                line.push_str(&format!("  [{}]", skill.tags.join(", ")));
            }
            println!("{}", style.list_item(&line));
        }

        let mut footer = format!(
            "Showing {}-{} of {}",
            page.offset + 1,
            page.offset + page.returned,
            page.total
        );
        if page.has_next_page {
            footer.push_str(&format!(
                "  (next: --offset {})",
                page.offset + page.returned
            ));
        }
        println!("{}", style.detail(&footer));
        Ok(())
    }
}
