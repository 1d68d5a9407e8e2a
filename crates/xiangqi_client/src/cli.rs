//! Command-line interface for the Xiangqi client.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Xiangqi - terminal client for a remote rules engine
#[derive(Parser, Debug)]
#[command(name = "xiangqi")]
#[command(about = "Play Xiangqi against a remote rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rules engine URL (overrides config and environment)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the terminal UI
    #[default]
    Play,

    /// Fetch the current state once and print it
    State,
}
