//! Lens CLI - identify items in photos via multi-provider vision AI.
//!
//! Lens sends an image to a chain of vision providers and prints the first
//! usable answer as JSON. Providers that fail, time out, or rate limit are
//! skipped in favour of the next one in priority order.
//!
//! # Usage
//!
//! ```bash
//! # Classify an item for waste sorting
//! lens analyze photo.jpg
//!
//! # Ask a custom question and print the raw answer
//! lens analyze photo.jpg --prompt "What material is this?" --raw
//!
//! # See which providers would be tried, in order
//! lens providers
//!
//! # View configuration
//! lens config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Lens - identify items in photos via multi-provider vision AI.
#[derive(Parser, Debug)]
#[command(name = "lens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze an image, failing over across providers
    Analyze(cli::analyze::AnalyzeArgs),

    /// List the providers that would be tried, in priority order
    Providers(cli::providers::ProvidersArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match lens_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `lens config path`."
            );
            lens_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Lens v{}", lens_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, &config).await,
        Commands::Providers(args) => cli::providers::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
