//! PromptDeck CLI — the main entry point.
//!
//! Commands:
//! - `demo`        — Walk through a scripted build of a context window
//! - `replay`      — Apply a JSON file of input events and print snapshots
//! - `interactive` — Drive the deck from a line-oriented prompt
//! - `status`      — Show the effective configuration
//! - `config`      — Show, validate, locate or create the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "promptdeck",
    about = "PromptDeck — drag-and-drop context window builder",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted example scenario
    Demo {
        /// Seed for synthetic token costs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Apply input events from a JSON file
    Replay {
        /// Path to a JSON array of input events
        file: PathBuf,

        /// Seed for synthetic token costs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print a snapshot after every event, not just the last
        #[arg(long)]
        each: bool,
    },

    /// Build a deck interactively
    Interactive {
        /// Seed for synthetic token costs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show the effective configuration
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the config file path
    Path,
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Demo { seed } => commands::demo::run(seed).await?,
        Commands::Replay { file, seed, each } => commands::replay::run(&file, seed, each).await?,
        Commands::Interactive { seed } => commands::interactive::run(seed).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Init => commands::config_cmd::init().await?,
        },
    }

    Ok(())
}
