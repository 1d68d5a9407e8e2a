//! Xiangqi client - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xiangqi_client::{ClientConfig, HttpRulesEngine, RulesEngine, turn_label};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.server_url {
        config = config.with_server_url(url);
    }

    match cli.command.unwrap_or_default() {
        Command::Play => xiangqi_client::tui::run_tui(config).await,
        Command::State => print_state(config).await,
    }
}

/// Fetch the current state and print it as text
async fn print_state(config: ClientConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let engine = HttpRulesEngine::from_config(&config)?;
    let state = engine.fetch_state().await?;
    info!(server_url = %config.server_url(), "Fetched state");

    println!("{}", state.board().display());
    println!();
    println!("{}", turn_label(&state));
    Ok(())
}
