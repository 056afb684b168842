//! Helio CLI
//!
//! Command-line interface for the Helio Additive thermal simulation and
//! optimization API: upload G-code, run simulations and optimizations,
//! browse the printer/material catalog, and download result artifacts.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "helio")]
#[command(about = "Helio Additive thermal simulation CLI", long_about = None)]
struct Cli {
    /// API endpoint URL (defaults to the global endpoint)
    #[arg(long, env = "HELIO_API_URL")]
    api_url: Option<String>,

    /// Personal Access Token (falls back to ~/.helio_config)
    #[arg(long, env = "HELIO_PAT", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helio_cli=info,helio_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        token: cli.token,
    };

    handle_command(cli.command, &config).await
}
