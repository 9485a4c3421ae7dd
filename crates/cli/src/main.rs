//! brandbot CLI: the main entry point.
//!
//! Commands:
//! - `run`        Connect to Discord and serve slash commands
//! - `ask`        Run one slash command in the terminal
//! - `providers`  Show the provider fallback order
//! - `knowledge`  Inspect or feed the knowledge base
//! - `doctor`     Diagnose configuration
//! - `init`       Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "brandbot",
    about = "brandbot: brand and marketing assistant for Discord",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.brandbot/config.toml)
    #[arg(short, long, global = true, env = "BRANDBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve slash commands
    Run,

    /// Run a slash command locally, e.g. `brandbot ask brand query="new tagline"`
    Ask {
        /// Command name, as on Discord (brand, blog, ask, add_info, ...)
        command: String,

        /// Options as name=value pairs
        #[arg(value_name = "NAME=VALUE")]
        options: Vec<String>,

        /// File to send as the upload (for upload_doc)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Directory to save an attached file into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the provider fallback order
    Providers {
        /// Also call each provider's health check
        #[arg(long)]
        check: bool,
    },

    /// Inspect or feed the knowledge base
    Knowledge {
        #[command(subcommand)]
        action: KnowledgeAction,
    },

    /// Diagnose configuration
    Doctor,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum KnowledgeAction {
    /// Show entry counts and sources
    Status,

    /// Add or replace a manual entry
    Add { title: String, content: String },

    /// Learn from a web page
    LearnUrl { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run => commands::run::run(config_path).await?,
        Commands::Ask {
            command,
            options,
            file,
            out,
        } => commands::ask::run(config_path, &command, &options, file, out).await?,
        Commands::Providers { check } => commands::providers::run(config_path, check).await?,
        Commands::Knowledge { action } => match action {
            KnowledgeAction::Status => commands::knowledge::status(config_path).await?,
            KnowledgeAction::Add { title, content } => {
                commands::knowledge::add(config_path, &title, &content).await?
            }
            KnowledgeAction::LearnUrl { url } => {
                commands::knowledge::learn_url(config_path, &url).await?
            }
        },
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Init { force } => commands::init::run(config_path, force)?,
    }

    Ok(())
}
