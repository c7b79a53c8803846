//! Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::error::CliResult;

/// smesh, the skill registry and installer for agent runtimes
#[derive(Parser, Debug)]
#[command(name = "smesh")]
#[command(bin_name = "smesh")]
#[command(about = "Decentralized skill registry and installer for AI agent runtimes")]
#[command(
    long_about = "smesh: install, publish, and inspect skill packages on a decentralized registry.\n\nQuick start:\n  smesh search scraper        Find skills\n  smesh install web-scraper   Install a skill and its dependencies\n  smesh publish ./my-skill    Pack and register a skill\n  smesh registry serve        Run a local development registry"
)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Search skills by name, description, or tag
    #[command(about = "Search the registry for skills matching a query")]
    Search {
        /// Search query; empty matches everything
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// List registered skills
    #[command(about = "List registered skills with pagination and filters")]
    List {
        /// Page size
        #[arg(short, long)]
        limit: Option<u64>,

        /// Number of skills to skip
        #[arg(short, long)]
        offset: Option<u64>,

        /// Only skills by this author
        #[arg(long)]
        author: Option<String>,

        /// Require this tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Substring filter on the skill name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show registry process information
    #[command(about = "Show the registry's capabilities and message schemas")]
    Info,

    /// Show a skill's version history
    #[command(about = "Show the published versions of a skill, newest first")]
    Versions {
        /// Skill name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Show download statistics
    #[command(about = "Show download statistics for the registry or one skill")]
    Stats {
        /// Skill name; omit for registry-wide statistics
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Time range: 7, 30, or all
        #[arg(long = "range", value_name = "RANGE", default_value = "all")]
        time_range: String,
    },

    /// Install a skill and its dependencies
    #[command(about = "Resolve, fetch, and install a skill with its dependencies")]
    Install {
        /// Skill to install, `name` or `name@version`
        #[arg(value_name = "SKILL")]
        spec: String,

        /// Install directory (defaults to the configured target)
        #[arg(short, long, value_name = "DIR")]
        target: Option<PathBuf>,

        /// Reinstall even when the exact version is already present
        #[arg(short, long)]
        force: bool,

        /// Print the resolved dependency tree
        #[arg(long)]
        tree: bool,
    },

    /// Pack and publish a skill
    #[command(about = "Pack a skill directory, upload the bundle, and register it")]
    Publish {
        /// Directory containing the skill and its skill.json manifest
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },

    /// Registry utilities
    #[command(about = "Run registry utilities such as a local development registry")]
    Registry {
        #[command(subcommand)]
        action: RegistrySubcommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RegistrySubcommand {
    /// Serve a local development registry speaking the mesh protocol
    #[command(about = "Serve an in-memory registry with gateway and messenger endpoints")]
    Serve {
        /// Port for the combined gateway and messenger endpoints
        #[arg(short, long, default_value_t = 4000)]
        port: u16,

        /// Process id the registry answers as
        #[arg(long, default_value = "registry")]
        process_id: String,
    },
}

/// Parses the command line and runs the chosen command
pub struct CommandRouter;

impl CommandRouter {
    /// Route and execute the current invocation
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();
        crate::logging::init(cli.verbose);
        Self::execute(&cli).await
    }

    /// Execute a parsed command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Search { query, limit } => {
                SearchCommand::new(query.clone(), *limit).execute().await
            }
            Commands::List {
                limit,
                offset,
                author,
                tags,
                name,
            } => {
                ListCommand::new(*limit, *offset, author.clone(), tags.clone(), name.clone())
                    .execute()
                    .await
            }
            Commands::Info => InfoCommand::new().execute().await,
            Commands::Versions { name } => VersionsCommand::new(name.clone()).execute().await,
            Commands::Stats { name, time_range } => {
                StatsCommand::new(name.clone(), time_range.clone())
                    .execute()
                    .await
            }
            Commands::Install {
                spec,
                target,
                force,
                tree,
            } => {
                InstallCommand::new(spec.clone())
                    .with_target(target.clone())
                    .with_force(*force)
                    .with_tree(*tree)
                    .execute()
                    .await
            }
            Commands::Publish { dir } => PublishCommand::new(dir.clone()).execute().await,
            Commands::Registry { action } => match action {
                RegistrySubcommand::Serve { port, process_id } => {
                    ServeCommand::new(*port, process_id.clone()).execute().await
                }
            },
        }
    }
}
