pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "expense")]
#[command(about = "Expense CLI - Command-line client for the Expense Tracker API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "API base URL (defaults to EXPENSE_API_URL or http://localhost:5000)"
    )]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Server status and information")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Account registration and authentication")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Resolve the API base URL: --server flag, then EXPENSE_API_URL, then the
/// default local port.
pub fn base_url(cli: &Cli) -> String {
    cli.server
        .clone()
        .or_else(|| std::env::var("EXPENSE_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:5000".to_string())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base = base_url(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &base, &output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &base, &output_format).await,
    }
}
