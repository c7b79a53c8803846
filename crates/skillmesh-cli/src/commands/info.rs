//! Info command

use async_trait::async_trait;

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Show the registry process's capabilities
pub struct InfoCommand;

impl InfoCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InfoCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for InfoCommand {
    async fn execute(&self) -> CliResult<()> {
        let config = CliConfig::load()?;
        let client = registry_client(&config)?;

        let reply = client.info().await?;
        let process = &reply.process;

        let style = OutputStyle::default();
        println!("{}", style.section("Process"));
        println!("{}", style.key_value("name", &process.name));
        println!("{}", style.key_value("version", &process.version));
        println!(
            "{}",
            style.key_value("protocol", &process.protocol_version)
        );
        println!(
            "{}",
            style.key_value("capabilities", &process.capabilities.join(", "))
        );

        println!("{}", style.section("Handlers"));
        for handler in &reply.handlers {
            println!("{}", style.list_item(handler));
        }
        Ok(())
    }
}
