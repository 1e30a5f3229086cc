use std::path::PathBuf;

use clap::Args;
use creatordesk_core::storage::ImportBundle;
use creatordesk_core::{Config, SqliteStore};

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file with creators, campaigns, bookings, deliverables, payments
    file: PathBuf,
}

pub fn run(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(file = %args.file.display(), "loading import bundle");
    let content = std::fs::read_to_string(&args.file)?;
    let bundle: ImportBundle = serde_json::from_str(&content)?;

    let config = Config::load()?;
    let store = SqliteStore::open_configured(&config)?;
    let summary = store.import(&bundle)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
