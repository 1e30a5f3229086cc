use chrono::{DateTime, Utc};
use clap::Args;

use super::{open_engine, parse_date};

#[derive(Args)]
pub struct RescheduleArgs {
    /// Event id, e.g. "deliverable-<id>"
    event_id: String,
    /// New start date
    #[arg(value_parser = parse_date)]
    start: DateTime<Utc>,
    /// New end date
    #[arg(long, value_parser = parse_date)]
    end: Option<DateTime<Utc>>,
}

pub async fn run(args: RescheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    engine
        .reschedule_event(&args.event_id, args.start, args.end)
        .await?;
    println!("rescheduled {} to {}", args.event_id, args.start.to_rfc3339());
    Ok(())
}
