//! End-to-end tests: SQLite store behind the calendar engine.

use chrono::{DateTime, TimeZone, Utc};
use creatordesk_core::storage::ImportBundle;
use creatordesk_core::{
    Booking, BookingStatus, CalendarConfig, CalendarEngine, Campaign, Creator, DateWindow,
    Deliverable, DeliverableStatus, EventType, Payment, PaymentStatus, SqliteStore,
};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn bundle() -> ImportBundle {
    ImportBundle {
        creators: vec![Creator {
            id: "c1".into(),
            name: "Ava Stone".into(),
            handle: Some("@avastone".into()),
        }],
        campaigns: vec![Campaign {
            id: "k1".into(),
            name: "Summer Drop".into(),
            brand: Some("Acme".into()),
        }],
        bookings: vec![
            Booking::new("b1", BookingStatus::ContentSubmitted, at(2024, 1, 1))
                .with_creator("c1", "Ava Stone")
                .with_campaign("k1", "Summer Drop"),
        ],
        deliverables: vec![{
            let mut d = Deliverable::new("d1", "Unboxing reel", DeliverableStatus::Due)
                .due(at(2024, 1, 6))
                .published(at(2024, 1, 8))
                .for_booking("b1");
            d.platform = Some("instagram".into());
            d
        }],
        payments: vec![Payment {
            id: "p1".into(),
            booking_id: Some("b1".into()),
            creator_id: None,
            campaign_id: None,
            creator_name: None,
            amount_cents: 250_000,
            currency: "USD".into(),
            status: PaymentStatus::Pending,
            due_date: Some(at(2024, 1, 31)),
        }],
    }
}

#[tokio::test]
async fn imported_records_synthesize_with_joined_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("creatordesk.db")).unwrap();
    let summary = store.import(&bundle()).unwrap();
    assert_eq!(summary.bookings, 1);
    assert_eq!(summary.payments, 1);

    let engine = CalendarEngine::new(store, CalendarConfig::default());
    let now = at(2024, 1, 2);
    let events = engine.events_at(DateWindow::unbounded(), now).await.unwrap();

    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            EventType::ApprovalNeeded,
            EventType::BookingDeadline,
            EventType::DeliverableDue,
            EventType::PaymentDue,
        ]
    );

    let deliverable = &events[2];
    assert_eq!(deliverable.title, "Unboxing reel due");
    assert_eq!(
        deliverable.description,
        "instagram content by Ava Stone for Summer Drop"
    );
    assert_eq!(deliverable.creator_id.as_deref(), Some("c1"));
    assert_eq!(deliverable.campaign_id.as_deref(), Some("k1"));
    assert_eq!(deliverable.end_date, Some(at(2024, 1, 8)));

    let payment = &events[3];
    assert_eq!(payment.title, "Pay Ava Stone");
    assert_eq!(payment.booking_id.as_deref(), Some("b1"));
}

#[tokio::test]
async fn due_date_update_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creatordesk.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.import(&bundle()).unwrap();
        let engine = CalendarEngine::new(store, CalendarConfig::default());
        engine
            .update_deliverable_due_date("d1", at(2024, 1, 15))
            .await
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let engine = CalendarEngine::new(store, CalendarConfig::default());
    let events = engine
        .events_at(
            DateWindow::between(at(2024, 1, 10), at(2024, 1, 20)),
            at(2024, 1, 2),
        )
        .await
        .unwrap();
    let deliverable = events
        .iter()
        .find(|e| e.id == "deliverable-d1")
        .expect("moved deliverable should be in the window");
    assert_eq!(deliverable.start_date, at(2024, 1, 15));
}

#[tokio::test]
async fn reimport_replaces_records() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.import(&bundle()).unwrap();

    let mut changed = bundle();
    changed.bookings[0].status = BookingStatus::Completed;
    store.import(&changed).unwrap();

    let engine = CalendarEngine::new(store, CalendarConfig::default());
    let events = engine
        .events_at(DateWindow::unbounded(), at(2024, 1, 2))
        .await
        .unwrap();
    let bookings: Vec<_> = events
        .iter()
        .filter(|e| e.booking_id.as_deref() == Some("b1") && e.deliverable_id.is_none())
        .filter(|e| e.event_type != EventType::PaymentDue)
        .collect();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].start_date, at(2024, 1, 1));
}
