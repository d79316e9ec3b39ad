//! Main entry point for the Suggester bot.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use suggester_bot::SuggesterBot;
use suggester_common::init_logging;
use suggester_config::ConfigLoader;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "SUGGESTER_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log level filter, overrides the configuration file
    #[arg(short, long, env = "SUGGESTER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Held for the process lifetime so buffered file logs are written
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting Suggester bot v{}", env!("CARGO_PKG_VERSION"));

    let bot = SuggesterBot::new(config)?;
    if let Err(e) = bot.start().await {
        error!("Bot stopped with an error: {}", e);
        return Err(e.into());
    }

    info!("Suggester bot has shut down");
    Ok(())
}
