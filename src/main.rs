//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_redirect` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dns_redirect::{init_logger_with, init_state, serve, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let state = init_state(&config).context("Failed to initialize service state")?;

    if let Err(e) = serve(config.port, state).await {
        eprintln!("dns_redirect error: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
