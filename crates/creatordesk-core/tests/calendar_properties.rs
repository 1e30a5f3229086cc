//! Property tests for synthesis and statistics.

use chrono::{DateTime, Duration, TimeZone, Utc};
use creatordesk_core::calendar::{compute_stats, synth, synthesize_all, Links, RecordSet, SynthesisContext};
use creatordesk_core::{Booking, BookingStatus, Deliverable, DeliverableStatus, EventStatus};
use proptest::prelude::*;

// 2020-01-01 .. 2030-01-01
const MIN_TS: i64 = 1_577_836_800;
const MAX_TS: i64 = 1_893_456_000;

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_TS..MAX_TS).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn booking_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::InProcess),
        Just(BookingStatus::ContentSubmitted),
        Just(BookingStatus::Approved),
        Just(BookingStatus::Completed),
        Just(BookingStatus::Canceled),
        Just(BookingStatus::Unknown),
    ]
}

fn deliverable_status() -> impl Strategy<Value = DeliverableStatus> {
    prop_oneof![
        Just(DeliverableStatus::Planned),
        Just(DeliverableStatus::Due),
        Just(DeliverableStatus::Submitted),
        Just(DeliverableStatus::Revision),
        Just(DeliverableStatus::Approved),
        Just(DeliverableStatus::Scheduled),
        Just(DeliverableStatus::Posted),
        Just(DeliverableStatus::Unknown),
    ]
}

fn booking() -> impl Strategy<Value = Booking> {
    ("[a-z0-9]{1,8}", booking_status(), timestamp())
        .prop_map(|(id, status, created_at)| Booking::new(id, status, created_at))
}

fn deliverable() -> impl Strategy<Value = Deliverable> {
    (
        "[a-z0-9]{1,8}",
        deliverable_status(),
        proptest::option::of(timestamp()),
    )
        .prop_map(|(id, status, due)| {
            let d = Deliverable::new(id, "Content", status);
            match due {
                Some(due) => d.due(due),
                None => d,
            }
        })
}

fn record_set() -> impl Strategy<Value = RecordSet> {
    (
        proptest::collection::vec(booking(), 0..12),
        proptest::collection::vec(deliverable(), 0..12),
    )
        .prop_map(|(bookings, deliverables)| RecordSet {
            bookings,
            deliverables,
            payments: vec![],
        })
}

proptest! {
    #[test]
    fn synthesis_is_deterministic(records in record_set(), now in timestamp()) {
        let links = Links::relative();
        let ctx = SynthesisContext::new(now, &links);
        let first = synthesize_all(&records, &ctx);
        let second = synthesize_all(&records, &ctx);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn events_are_sorted_by_start(records in record_set(), now in timestamp()) {
        let links = Links::relative();
        let events = synthesize_all(&records, &SynthesisContext::new(now, &links));
        prop_assert!(events.windows(2).all(|w| w[0].start_date <= w[1].start_date));
    }

    #[test]
    fn booking_ids_ignore_other_fields(
        id in "[a-z0-9]{1,8}",
        a in booking_status(),
        b in booking_status(),
        created_a in timestamp(),
        created_b in timestamp(),
        now in timestamp(),
    ) {
        let links = Links::relative();
        let ctx = SynthesisContext::new(now, &links);
        let first = synth::synthesize_booking(&Booking::new(id.clone(), a, created_a), &ctx);
        let second = synth::synthesize_booking(&Booking::new(id.clone(), b, created_b), &ctx);
        let expected = format!("booking-deadline-{id}");
        prop_assert_eq!(&first[0].id, &expected);
        prop_assert_eq!(&second[0].id, &expected);
    }

    #[test]
    fn deliverable_ids_ignore_other_fields(
        id in "[a-z0-9]{1,8}",
        status in deliverable_status(),
        due in timestamp(),
        now in timestamp(),
    ) {
        let links = Links::relative();
        let ctx = SynthesisContext::new(now, &links);
        let d = Deliverable::new(id.clone(), "Anything", status).due(due);
        let event = synth::synthesize_deliverable(&d, &ctx).unwrap();
        prop_assert_eq!(event.id, format!("deliverable-{id}"));
    }

    #[test]
    fn pending_deadline_is_seven_days_out(created in timestamp(), now in timestamp()) {
        let links = Links::relative();
        let ctx = SynthesisContext::new(now, &links);
        let events = synth::synthesize_booking(
            &Booking::new("b", BookingStatus::Pending, created),
            &ctx,
        );
        prop_assert_eq!(events[0].start_date, created + Duration::days(7));
    }

    #[test]
    fn past_deadlines_are_overdue_unless_closed(
        status in booking_status(),
        created in timestamp(),
        lag_secs in 1i64..10_000_000,
    ) {
        let links = Links::relative();
        let deadline = creatordesk_core::calendar::mapping::projected_deadline(status, created);
        let now = deadline + Duration::seconds(lag_secs);
        let ctx = SynthesisContext::new(now, &links);
        let event = &synth::synthesize_booking(&Booking::new("b", status, created), &ctx)[0];
        match status {
            BookingStatus::Completed => prop_assert_eq!(event.status, EventStatus::Completed),
            BookingStatus::Canceled => prop_assert_eq!(event.status, EventStatus::Cancelled),
            _ => prop_assert_eq!(event.status, EventStatus::Overdue),
        }
    }

    #[test]
    fn stats_totals_are_consistent(records in record_set(), now in timestamp()) {
        let links = Links::relative();
        let events = synthesize_all(&records, &SynthesisContext::new(now, &links));
        let stats = compute_stats(&events, now, 7);
        prop_assert_eq!(stats.total_events, events.len());
        prop_assert_eq!(stats.by_status.values().sum::<usize>(), stats.total_events);
        prop_assert_eq!(stats.by_type.values().sum::<usize>(), stats.total_events);
        prop_assert_eq!(stats.by_priority.values().sum::<usize>(), stats.total_events);
        prop_assert!(stats.overdue_count <= stats.total_events);
    }
}
