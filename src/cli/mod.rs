pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "expense")]
#[command(about = "Expense CLI - track personal expenses against the Expense Tracker API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL; stored in the session for later commands")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Registration, login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Create, list, change and delete expenses")]
    Expense {
        #[command(subcommand)]
        cmd: commands::expense::ExpenseCommands,
    },

    #[command(about = "Totals overall and per category")]
    Summary(commands::summary::SummaryArgs),

    #[command(about = "Manage your expense categories")]
    Category {
        #[command(subcommand)]
        cmd: commands::category::CategoryCommands,
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

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    if let Some(server) = &cli.server {
        let mut session = config::load_session()?;
        if session.server_url != *server {
            tracing::debug!("Switching server from {} to {}", session.server_url, server);
            session.server_url = server.clone();
            config::save_session(&session)?;
        }
    }

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Expense { cmd } => commands::expense::handle(cmd, output_format).await,
        Commands::Summary(args) => commands::summary::handle(args, output_format).await,
        Commands::Category { cmd } => commands::category::handle(cmd, output_format).await,
    }
}
