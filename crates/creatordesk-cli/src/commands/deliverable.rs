use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::{open_engine, parse_date};

#[derive(Subcommand)]
pub enum DeliverableAction {
    /// Set a deliverable's due date
    Due {
        /// Deliverable ID
        id: String,
        /// New due date
        #[arg(value_parser = parse_date)]
        date: DateTime<Utc>,
    },
    /// Show a deliverable
    Get {
        /// Deliverable ID
        id: String,
    },
}

pub async fn run(action: DeliverableAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    match action {
        DeliverableAction::Due { id, date } => {
            engine.update_deliverable_due_date(&id, date).await?;
            println!("deliverable {id} due {}", date.to_rfc3339());
        }
        DeliverableAction::Get { id } => match engine.source().deliverable(&id)? {
            Some(deliverable) => println!("{}", serde_json::to_string_pretty(&deliverable)?),
            None => return Err(format!("deliverable '{id}' not found").into()),
        },
    }
    Ok(())
}
