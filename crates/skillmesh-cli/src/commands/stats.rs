//! Stats command

use async_trait::async_trait;

use skillmesh_types::stats::{AggregateStats, SkillStats, TimeRange};

use crate::commands::{registry_client, Command};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Show download counts, for one skill or the whole registry
pub struct StatsCommand {
    name: Option<String>,
    time_range: String,
}

impl StatsCommand {
    pub fn new(name: Option<String>, time_range: String) -> Self {
        Self { name, time_range }
    }
}

#[async_trait]
impl Command for StatsCommand {
    async fn execute(&self) -> CliResult<()> {
        let range = TimeRange::parse(&self.time_range).ok_or_else(|| {
            CliError::InvalidArgument {
                message: format!(
                    "unknown time range '{}', expected 7, 30 or all",
                    self.time_range
                ),
            }
        })?;

        let config = CliConfig::load()?;
        let client = registry_client(&config)?;
        let style = OutputStyle::default();

        match &self.name {
            Some(name) => {
                let stats = client.skill_stats(name, range).await?;
                print_skill_stats(&style, &stats);
            }
            None => {
                let stats = client.aggregate_stats(range).await?;
                print_aggregate_stats(&style, &stats);
            }
        }
        Ok(())
    }
}

fn print_skill_stats(style: &OutputStyle, stats: &SkillStats) {
    match stats {
        SkillStats::All {
            skill_name,
            version,
            downloads_total,
            downloads_7_days,
            downloads_30_days,
        } => {
            println!("{}", style.header(&format!("{}@{}", skill_name, version)));
            println!("{}", style.key_value("Downloads (total)", &downloads_total.to_string()));
            println!("{}", style.key_value("Downloads (7 days)", &downloads_7_days.to_string()));
            println!("{}", style.key_value("Downloads (30 days)", &downloads_30_days.to_string()));
        }
        SkillStats::Days30 {
            skill_name,
            version,
            downloads_30_days,
        } => {
            println!("{}", style.header(&format!("{}@{}", skill_name, version)));
            println!("{}", style.key_value("Downloads (30 days)", &downloads_30_days.to_string()));
        }
        SkillStats::Days7 {
            skill_name,
            version,
            downloads_7_days,
        } => {
            println!("{}", style.header(&format!("{}@{}", skill_name, version)));
            println!("{}", style.key_value("Downloads (7 days)", &downloads_7_days.to_string()));
        }
    }
}

fn print_aggregate_stats(style: &OutputStyle, stats: &AggregateStats) {
    println!("{}", style.header("Registry downloads"));
    match stats {
        AggregateStats::All {
            total_skills,
            downloads_total,
            downloads_7_days,
            downloads_30_days,
        } => {
            println!("{}", style.key_value("Skills", &total_skills.to_string()));
            println!("{}", style.key_value("Downloads (total)", &downloads_total.to_string()));
            println!("{}", style.key_value("Downloads (7 days)", &downloads_7_days.to_string()));
            println!("{}", style.key_value("Downloads (30 days)", &downloads_30_days.to_string()));
        }
        AggregateStats::Days30 {
            total_skills,
            downloads_30_days,
        } => {
            println!("{}", style.key_value("Skills", &total_skills.to_string()));
            println!("{}", style.key_value("Downloads (30 days)", &downloads_30_days.to_string()));
        }
        AggregateStats::Days7 {
            total_skills,
            downloads_7_days,
        } => {
            println!("{}", style.key_value("Skills", &total_skills.to_string()));
            println!("{}", style.key_value("Downloads (7 days)", &downloads_7_days.to_string()));
        }
    }
}
