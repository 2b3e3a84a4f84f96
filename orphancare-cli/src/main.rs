//! OrphanCare CLI - orphanage records from your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use orphancare_core::OperationResult;

mod commands;
mod output;

use commands::{auth, children, config, dashboard, health, logs, nutrition};

/// OrphanCare - children, health and nutrition records for an orphanage
#[derive(Parser)]
#[command(name = "oc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session on this machine
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short)]
        email: Option<String>,
        /// Account password (prompted, or read from stdin when piped)
        #[arg(long, short)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show orphanage statistics
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage children
    Children {
        #[command(subcommand)]
        command: children::ChildrenCommands,
    },

    /// Manage health records
    Health {
        #[command(subcommand)]
        command: health::HealthCommands,
    },

    /// Manage nutrition records
    Nutrition {
        #[command(subcommand)]
        command: nutrition::NutritionCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Whether the command was asked for JSON output
    fn json(&self) -> bool {
        match self {
            Commands::Login { json, .. }
            | Commands::Logout { json }
            | Commands::Whoami { json }
            | Commands::Dashboard { json } => *json,
            Commands::Children { command } => command.json(),
            Commands::Health { command } => command.json(),
            Commands::Nutrition { command } => command.json(),
            Commands::Config { command } => command.json(),
            Commands::Logs { command } => command.json(),
        }
    }
}

/// Failure as printed for `--json` callers
fn json_failure(e: anyhow::Error) -> OperationResult<()> {
    match e.downcast::<orphancare_core::Error>() {
        Ok(core) => OperationResult::from(Err::<(), _>(core)),
        Err(other) => OperationResult::fail(format!("{:#}", other)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.command.json();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if json => {
            let failure = json_failure(e);
            match serde_json::to_string_pretty(&failure) {
                Ok(text) => println!("{}", text),
                Err(_) => output::error(failure.error.as_deref().unwrap_or("Unknown error")),
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            if let Some(core) = e.downcast_ref::<orphancare_core::Error>() {
                if core.requires_reauth() {
                    output::info("Run `oc login` to sign in again.");
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password, json } => auth::login(email, password, json).await,
        Commands::Logout { json } => auth::logout(json).await,
        Commands::Whoami { json } => auth::whoami(json).await,
        Commands::Dashboard { json } => dashboard::run(json).await,
        Commands::Children { command } => children::run(command).await,
        Commands::Health { command } => health::run(command).await,
        Commands::Nutrition { command } => nutrition::run(command).await,
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
