//! Headline counts over a synthesized event set.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{CalendarEvent, EventPriority, EventStatus, EventType};

/// Aggregate snapshot over one window. Breakdown maps only hold keys that
/// were actually observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarStats {
    pub total_events: usize,
    pub overdue_count: usize,
    pub due_today: usize,
    pub due_this_week: usize,
    pub by_type: BTreeMap<EventType, usize>,
    pub by_status: BTreeMap<EventStatus, usize>,
    pub by_priority: BTreeMap<EventPriority, usize>,
}

/// `[00:00:00, 23:59:59.999]` of `now`'s UTC day.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// An event counts as overdue if it was marked so, or if it is still
/// `scheduled` with a start in the past.
pub fn is_overdue(event: &CalendarEvent, now: DateTime<Utc>) -> bool {
    event.status == EventStatus::Overdue
        || (event.start_date < now && event.status == EventStatus::Scheduled)
}

/// Compute stats for `events` as seen at `now`.
///
/// `due_soon_days` sets the "this week" horizon.
pub fn compute_stats(
    events: &[CalendarEvent],
    now: DateTime<Utc>,
    due_soon_days: i64,
) -> CalendarStats {
    let (today_start, today_end) = day_bounds(now);
    let week_end = Duration::try_days(due_soon_days)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut stats = CalendarStats {
        total_events: events.len(),
        ..CalendarStats::default()
    };

    for event in events {
        if is_overdue(event, now) {
            stats.overdue_count += 1;
        }
        if event.start_date >= today_start && event.start_date <= today_end {
            stats.due_today += 1;
        }
        if event.start_date >= now && event.start_date <= week_end {
            stats.due_this_week += 1;
        }

        *stats.by_type.entry(event.event_type).or_insert(0) += 1;
        *stats.by_status.entry(event.status).or_insert(0) += 1;
        *stats.by_priority.entry(event.priority).or_insert(0) += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, start: DateTime<Utc>, status: EventStatus) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            event_type: EventType::DeliverableDue,
            priority: EventPriority::Medium,
            status,
            start_date: start,
            end_date: None,
            all_day: true,
            booking_id: None,
            deliverable_id: Some(id.into()),
            campaign_id: None,
            creator_id: None,
            color: "#000000".into(),
            url: format!("/deliverables/{id}"),
        }
    }

    #[test]
    fn day_bounds_cover_utc_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let (start, end) = day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap());
        assert_eq!(end.date_naive(), now.date_naive());
        assert_eq!(end + Duration::milliseconds(1), start + Duration::days(1));
    }

    #[test]
    fn overdue_counts_stale_scheduled_events() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let events = vec![
            event("a", now - Duration::days(1), EventStatus::Scheduled),
            event("b", now + Duration::days(1), EventStatus::Overdue),
            event("c", now - Duration::days(1), EventStatus::Completed),
            event("d", now - Duration::days(1), EventStatus::InProgress),
        ];
        let stats = compute_stats(&events, now, 7);
        assert_eq!(stats.overdue_count, 2);
    }

    #[test]
    fn today_and_week_horizons() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let events = vec![
            event("morning", now - Duration::hours(6), EventStatus::Completed),
            event("evening", now + Duration::hours(6), EventStatus::Scheduled),
            event("friday", now + Duration::days(7), EventStatus::Scheduled),
            event("later", now + Duration::days(8), EventStatus::Scheduled),
        ];
        let stats = compute_stats(&events, now, 7);
        assert_eq!(stats.due_today, 2);
        assert_eq!(stats.due_this_week, 2);
    }

    #[test]
    fn breakdowns_are_sparse_and_sum_to_total() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let events = vec![
            event("a", now, EventStatus::Scheduled),
            event("b", now, EventStatus::Scheduled),
            event("c", now, EventStatus::Completed),
        ];
        let stats = compute_stats(&events, now, 7);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.by_status.len(), 2);
        assert!(!stats.by_status.contains_key(&EventStatus::Overdue));
        assert_eq!(stats.by_status.values().sum::<usize>(), stats.total_events);
        assert_eq!(stats.by_type.get(&EventType::DeliverableDue), Some(&3));
    }

    #[test]
    fn empty_input_yields_empty_maps() {
        let stats = compute_stats(&[], Utc::now(), 7);
        assert_eq!(stats, CalendarStats::default());
    }

    #[test]
    fn maps_serialize_with_string_keys() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let stats = compute_stats(&[event("a", now, EventStatus::Scheduled)], now, 7);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_type"]["deliverable_due"], 1);
        assert_eq!(json["by_priority"]["medium"], 1);
    }
}
