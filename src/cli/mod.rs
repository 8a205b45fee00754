//! CLI entry point for Integreat.

pub mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Integreat CLI
#[derive(Parser, Debug)]
#[command(
    name = "integreat",
    version,
    about = "InteGREAT: research what it takes to move to another country"
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Chat(ChatArgs),
    /// Ask a single question and exit
    Ask(AskArgs),
    /// List the supported destination countries
    Countries,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Destination country to start with
    #[arg(short, long)]
    pub country: Option<String>,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Destination country
    #[arg(short, long)]
    pub country: Option<String>,

    /// Search the destination's official sources instead of asking directly
    #[arg(long)]
    pub gov: bool,

    /// The question
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}
