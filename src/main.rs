use clap::{Parser, Subcommand};
use std::path::PathBuf;

use macroplan::commands::{ConfigCommand, JournalCommand, SummaryCommand, TaskCommand};
use macroplan::config::Config;
use macroplan::session::Session;
use macroplan::store::RestTableStore;

#[derive(Parser)]
#[command(name = "macroplan")]
#[command(version)]
#[command(about = "A personal task and journal planner", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage planner tasks
    Task(TaskCommand),

    /// Manage journal entries
    Journal(JournalCommand),

    /// Show task counts by priority
    Summary(SummaryCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Task(cmd)) => {
            let mut session = start_session(&config).await?;
            cmd.run(&mut session).await?;
        }
        Some(Commands::Journal(cmd)) => {
            let mut session = start_session(&config).await?;
            cmd.run(&mut session).await?;
        }
        Some(Commands::Summary(cmd)) => {
            let session = start_session(&config).await?;
            cmd.run(&session)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Opens the remote store and loads both tables. Missing credentials
/// fail here, before any command output.
async fn start_session(config: &Config) -> Result<Session<RestTableStore>, Box<dyn std::error::Error>> {
    let creds = config.credentials()?;
    let store = RestTableStore::new(creds.api_url, creds.base_id, creds.api_token);
    let session = Session::start(
        store,
        config.tasks_table.value.clone(),
        config.journal_table.value.clone(),
    )
    .await?;
    Ok(session)
}
