//! Merge per-source synthesis output into one ordered event list.

use super::event::CalendarEvent;
use super::synth::{self, SynthesisContext};
use crate::domain::{Booking, Deliverable, Payment};

/// Records fetched for one synthesis pass.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub bookings: Vec<Booking>,
    pub deliverables: Vec<Deliverable>,
    pub payments: Vec<Payment>,
}

/// Synthesize every record and sort the result by `start_date`.
///
/// The sort is stable, so ties keep source order: bookings, then
/// deliverables, then payments, each in fetch order.
pub fn synthesize_all(records: &RecordSet, ctx: &SynthesisContext<'_>) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = records
        .bookings
        .iter()
        .flat_map(|b| synth::synthesize_booking(b, ctx))
        .collect();
    events.extend(
        records
            .deliverables
            .iter()
            .filter_map(|d| synth::synthesize_deliverable(d, ctx)),
    );
    events.extend(
        records
            .payments
            .iter()
            .filter_map(|p| synth::synthesize_payment(p, ctx)),
    );

    sort_events(&mut events);
    events
}

/// Ascending by start date, stable.
pub fn sort_events(events: &mut [CalendarEvent]) {
    events.sort_by_key(|e| e.start_date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::synth::Links;
    use crate::domain::{BookingStatus, DeliverableStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn merged_events_are_sorted() {
        let links = Links::relative();
        let ctx = SynthesisContext::new(at(2024, 1, 1), &links);
        let records = RecordSet {
            bookings: vec![
                Booking::new("slow", BookingStatus::InProcess, at(2024, 1, 1)),
                Booking::new("fast", BookingStatus::Approved, at(2024, 1, 1)),
            ],
            deliverables: vec![
                Deliverable::new("d1", "Reel", DeliverableStatus::Due).due(at(2024, 1, 5)),
                Deliverable::new("d2", "Post", DeliverableStatus::Planned),
            ],
            payments: vec![],
        };

        let events = synthesize_all(&records, &ctx);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["booking-deadline-fast", "deliverable-d1", "booking-deadline-slow"]
        );
    }

    #[test]
    fn ties_keep_source_order() {
        let links = Links::relative();
        let ctx = SynthesisContext::new(at(2024, 1, 1), &links);
        let records = RecordSet {
            bookings: vec![Booking::new("b", BookingStatus::Pending, at(2024, 1, 1))],
            deliverables: vec![
                Deliverable::new("d", "Reel", DeliverableStatus::Due).due(at(2024, 1, 8)),
            ],
            payments: vec![],
        };
        let events = synthesize_all(&records, &ctx);
        assert_eq!(events[0].id, "booking-deadline-b");
        assert_eq!(events[1].id, "deliverable-d");
    }
}
