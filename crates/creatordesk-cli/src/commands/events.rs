use clap::Args;
use creatordesk_core::DateWindow;

use super::{open_engine, parse_date, parse_end_date};

#[derive(Args)]
pub struct EventsArgs {
    /// Window start (YYYY-MM-DD or RFC3339)
    #[arg(long, value_parser = parse_date)]
    from: Option<chrono::DateTime<chrono::Utc>>,
    /// Window end, inclusive (YYYY-MM-DD covers the whole UTC day, or RFC3339)
    #[arg(long, value_parser = parse_end_date)]
    to: Option<chrono::DateTime<chrono::Utc>>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: EventsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let events = engine
        .get_calendar_events(DateWindow::new(args.from, args.to))
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events.");
        return Ok(());
    }
    for event in &events {
        println!(
            "{}  {:<16} {:<11} {:<7} {}  [{}]",
            event.start_date.format("%Y-%m-%d %H:%M"),
            event.event_type.as_str(),
            event.status.as_str(),
            event.priority.as_str(),
            event.title,
            event.id,
        );
    }
    Ok(())
}
