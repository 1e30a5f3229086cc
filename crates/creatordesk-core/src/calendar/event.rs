//! Derived calendar event types.
//!
//! Events are a view over source records: nothing here is persisted, and an
//! event id always encodes the record it came from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a calendar event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BookingDeadline,
    DeliverableDue,
    ApprovalNeeded,
    ContentReview,
    PaymentDue,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookingDeadline => "booking_deadline",
            Self::DeliverableDue => "deliverable_due",
            Self::ApprovalNeeded => "approval_needed",
            Self::ContentReview => "content_review",
            Self::PaymentDue => "payment_due",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency tier, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl EventPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Derived progress state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Overdue => "overdue",
        }
    }
}

/// A synthesized calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub priority: EventPriority,
    pub status: EventStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    pub color: String,
    pub url: String,
}

const BOOKING_DEADLINE_PREFIX: &str = "booking-deadline-";
const BOOKING_APPROVAL_PREFIX: &str = "booking-approval-";
const DELIVERABLE_PREFIX: &str = "deliverable-";
const PAYMENT_PREFIX: &str = "payment-";

/// The source record behind an event id.
///
/// Ids are built from a fixed prefix per event kind plus the source id, so
/// the mapping is reversible as long as prefixes never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventRef {
    BookingDeadline(String),
    BookingApproval(String),
    Deliverable(String),
    Payment(String),
}

impl EventRef {
    /// Recover the source record from an event id.
    ///
    /// Returns `None` for ids outside the scheme, including a bare prefix
    /// with no source id.
    pub fn parse(event_id: &str) -> Option<Self> {
        let source_id = |prefix: &str| {
            event_id
                .strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        };

        if let Some(id) = source_id(BOOKING_DEADLINE_PREFIX) {
            Some(Self::BookingDeadline(id))
        } else if let Some(id) = source_id(BOOKING_APPROVAL_PREFIX) {
            Some(Self::BookingApproval(id))
        } else if let Some(id) = source_id(DELIVERABLE_PREFIX) {
            Some(Self::Deliverable(id))
        } else {
            source_id(PAYMENT_PREFIX).map(Self::Payment)
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Self::BookingDeadline(_) => EventType::BookingDeadline,
            Self::BookingApproval(_) => EventType::ApprovalNeeded,
            Self::Deliverable(_) => EventType::DeliverableDue,
            Self::Payment(_) => EventType::PaymentDue,
        }
    }

    pub fn source_id(&self) -> &str {
        match self {
            Self::BookingDeadline(id)
            | Self::BookingApproval(id)
            | Self::Deliverable(id)
            | Self::Payment(id) => id,
        }
    }

    /// The event id this reference encodes.
    pub fn event_id(&self) -> String {
        match self {
            Self::BookingDeadline(id) => format!("{BOOKING_DEADLINE_PREFIX}{id}"),
            Self::BookingApproval(id) => format!("{BOOKING_APPROVAL_PREFIX}{id}"),
            Self::Deliverable(id) => format!("{DELIVERABLE_PREFIX}{id}"),
            Self::Payment(id) => format!("{PAYMENT_PREFIX}{id}"),
        }
    }
}
