use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use creatordesk_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "creatordesk", version, about = "creatordesk booking calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List derived calendar events
    Events(commands::events::EventsArgs),
    /// Calendar statistics
    Stats(commands::stats::StatsArgs),
    /// Reschedule a calendar event by id
    Reschedule(commands::reschedule::RescheduleArgs),
    /// Deliverable management
    Deliverable {
        #[command(subcommand)]
        action: commands::deliverable::DeliverableAction,
    },
    /// Import records from a JSON bundle
    Import(commands::import::ImportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// `CREATORDESK_LOG` wins over the config file's `logging.filter`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREATORDESK_LOG").unwrap_or_else(|_| {
        let config = Config::load_or_default();
        EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Events(args) => commands::events::run(args).await,
        Commands::Stats(args) => commands::stats::run(args).await,
        Commands::Reschedule(args) => commands::reschedule::run(args).await,
        Commands::Deliverable { action } => commands::deliverable::run(action).await,
        Commands::Import(args) => commands::import::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
