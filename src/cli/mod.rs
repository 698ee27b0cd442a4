//! CLI module for the user directory
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply PostgreSQL schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::{self, LoggingConfig};

/// User directory - account registration, login and profile service
#[derive(Parser)]
#[command(name = "user-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply database migrations and exit
    Migrate,
}

/// Load `.env`, the layered configuration and the global subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&LoggingConfig::from(&config.logging))?;

    Ok(config)
}
