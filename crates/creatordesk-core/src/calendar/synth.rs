//! Event synthesis: source records in, calendar events out.
//!
//! Synthesis is a pure projection of `(record, now)`. Nothing is read from
//! or written to a store here; the engine fetches and this module derives.

use chrono::{DateTime, Utc};
use url::Url;

use super::event::{CalendarEvent, EventPriority, EventRef, EventStatus, EventType};
use super::mapping;
use crate::domain::{Booking, BookingStatus, Deliverable, Payment};

const UNKNOWN_CREATOR: &str = "Unknown creator";
const UNKNOWN_CAMPAIGN: &str = "Unknown campaign";

/// Builds deep links back to source records.
///
/// Without a base URL links are app-relative paths (`/bookings/<id>`). With
/// one, the segments are appended to the base path, so a dashboard mounted
/// under `/dashboard/` links to `/dashboard/bookings/<id>`. Ids are
/// percent-encoded either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    base: Option<Url>,
}

impl Links {
    pub fn relative() -> Self {
        Self { base: None }
    }

    pub fn with_base(base: Url) -> Self {
        Self { base: Some(base) }
    }

    /// Parse an optional base URL from config. Unparseable values fall back
    /// to relative links.
    pub fn from_config(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match Url::parse(raw) {
                Ok(url) => Self::with_base(url),
                Err(e) => {
                    tracing::warn!(base_url = raw, error = %e, "invalid links.base_url, using relative links");
                    Self::relative()
                }
            },
            None => Self::relative(),
        }
    }

    fn record(&self, collection: &str, id: &str) -> String {
        let path = format!(
            "/{}/{}",
            urlencoding::encode(collection),
            urlencoding::encode(id)
        );
        let Some(base) = &self.base else {
            return path;
        };

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().extend([collection, id]);
            }
            // cannot-be-a-base URLs such as `mailto:`
            Err(()) => return path,
        }
        url.into()
    }
}

/// Inputs shared by every synthesizer in one pass.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub now: DateTime<Utc>,
    pub links: &'a Links,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(now: DateTime<Utc>, links: &'a Links) -> Self {
        Self { now, links }
    }
}

fn creator_label(name: Option<&str>) -> &str {
    name.unwrap_or(UNKNOWN_CREATOR)
}

fn campaign_label(name: Option<&str>) -> &str {
    name.unwrap_or(UNKNOWN_CAMPAIGN)
}

/// Events for one booking: always a projected deadline, plus an approval
/// event while content is waiting on review.
pub fn synthesize_booking(booking: &Booking, ctx: &SynthesisContext<'_>) -> Vec<CalendarEvent> {
    let creator = creator_label(booking.creator_name.as_deref());
    let campaign = campaign_label(booking.campaign_name.as_deref());
    let deadline = mapping::projected_deadline(booking.status, booking.created_at);
    let url = ctx.links.record("bookings", &booking.id);

    let mut events = vec![CalendarEvent {
        id: EventRef::BookingDeadline(booking.id.clone()).event_id(),
        title: format!("{creator} deadline"),
        description: format!(
            "{campaign} booking with {creator} ({})",
            booking.status.as_str()
        ),
        event_type: EventType::BookingDeadline,
        priority: mapping::booking_priority(booking.status),
        status: mapping::booking_event_status(booking.status, deadline, ctx.now),
        start_date: deadline,
        end_date: None,
        all_day: true,
        booking_id: Some(booking.id.clone()),
        deliverable_id: None,
        campaign_id: booking.campaign_id.clone(),
        creator_id: booking.creator_id.clone(),
        color: mapping::booking_color(booking.status).to_string(),
        url: url.clone(),
    }];

    if booking.status == BookingStatus::ContentSubmitted {
        events.push(CalendarEvent {
            id: EventRef::BookingApproval(booking.id.clone()).event_id(),
            title: format!("Approve content from {creator}"),
            description: format!("{creator} submitted content for {campaign}"),
            event_type: EventType::ApprovalNeeded,
            priority: EventPriority::High,
            status: EventStatus::Scheduled,
            start_date: ctx.now,
            end_date: None,
            all_day: false,
            booking_id: Some(booking.id.clone()),
            deliverable_id: None,
            campaign_id: booking.campaign_id.clone(),
            creator_id: booking.creator_id.clone(),
            color: mapping::booking_color(booking.status).to_string(),
            url,
        });
    }

    events
}

/// The due-date event for a deliverable, or `None` when it has no due date.
pub fn synthesize_deliverable(
    deliverable: &Deliverable,
    ctx: &SynthesisContext<'_>,
) -> Option<CalendarEvent> {
    let due = deliverable.due_date?;
    let creator = creator_label(deliverable.creator_name.as_deref());
    let campaign = campaign_label(deliverable.campaign_name.as_deref());
    let description = match deliverable.platform.as_deref() {
        Some(platform) => format!("{platform} content by {creator} for {campaign}"),
        None => format!("Content by {creator} for {campaign}"),
    };

    Some(CalendarEvent {
        id: EventRef::Deliverable(deliverable.id.clone()).event_id(),
        title: format!("{} due", deliverable.title),
        description,
        event_type: EventType::DeliverableDue,
        priority: mapping::deliverable_priority(due, ctx.now),
        status: mapping::deliverable_event_status(deliverable.status, due, ctx.now),
        start_date: due,
        end_date: deliverable.publish_date,
        all_day: true,
        booking_id: deliverable.booking_id.clone(),
        deliverable_id: Some(deliverable.id.clone()),
        campaign_id: deliverable.campaign_id.clone(),
        creator_id: deliverable.creator_id.clone(),
        color: mapping::deliverable_color(deliverable.status).to_string(),
        url: ctx.links.record("deliverables", &deliverable.id),
    })
}

/// The due-date event for a payment.
///
/// Payments without a due date or without a booking reference produce
/// nothing: every event must point at a booking or a deliverable.
pub fn synthesize_payment(payment: &Payment, ctx: &SynthesisContext<'_>) -> Option<CalendarEvent> {
    let due = payment.due_date?;
    let Some(booking_id) = payment.booking_id.clone() else {
        tracing::debug!(payment_id = %payment.id, "payment has no booking, skipping");
        return None;
    };
    let creator = creator_label(payment.creator_name.as_deref());

    Some(CalendarEvent {
        id: EventRef::Payment(payment.id.clone()).event_id(),
        title: format!("Pay {creator}"),
        description: format!(
            "{} payout ({})",
            payment.display_amount(),
            payment.status.as_str()
        ),
        event_type: EventType::PaymentDue,
        priority: mapping::payment_priority(payment.status, due, ctx.now),
        status: mapping::payment_event_status(payment.status, due, ctx.now),
        start_date: due,
        end_date: None,
        all_day: true,
        booking_id: Some(booking_id),
        deliverable_id: None,
        campaign_id: payment.campaign_id.clone(),
        creator_id: payment.creator_id.clone(),
        color: mapping::payment_color(payment.status).to_string(),
        url: ctx.links.record("payments", &payment.id),
    })
}
