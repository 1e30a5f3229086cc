use clap::Args;
use creatordesk_core::DateWindow;

use super::{open_engine, parse_date, parse_end_date};

#[derive(Args)]
pub struct StatsArgs {
    /// Window start (defaults to now)
    #[arg(long, value_parser = parse_date)]
    from: Option<chrono::DateTime<chrono::Utc>>,
    /// Window end, inclusive; a bare date covers the whole UTC day
    /// (defaults to now + calendar.stats_window_days)
    #[arg(long, value_parser = parse_end_date)]
    to: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let stats = engine
        .get_calendar_stats(DateWindow::new(args.from, args.to))
        .await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
