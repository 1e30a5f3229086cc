pub mod config;
pub mod deliverable;
pub mod events;
pub mod import;
pub mod reschedule;
pub mod stats;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use creatordesk_core::{CalendarEngine, Config, SqliteStore};

/// Engine over the configured SQLite store.
pub fn open_engine() -> Result<CalendarEngine<SqliteStore>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open_configured(&config)?;
    Ok(CalendarEngine::new(store, config.calendar.clone()).with_links(config.links()))
}

/// Accepts RFC3339 or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_with_time(raw, NaiveTime::MIN)
}

/// Like [`parse_date`], but a bare date means the last millisecond of that
/// UTC day, so an inclusive `--to` covers the whole day.
pub fn parse_end_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    parse_with_time(raw, last_ms)
}

fn parse_with_time(raw: &str, time: NaiveTime) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(time).and_utc())
        .map_err(|_| format!("invalid date '{raw}': expected YYYY-MM-DD or RFC3339"))
}
