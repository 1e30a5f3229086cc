//! Status-to-attribute tables.
//!
//! Every function here is total: unknown statuses fall through to a safe
//! default (7 days, low priority, gray) instead of failing.

use chrono::{DateTime, Duration, Utc};

use super::event::{EventPriority, EventStatus};
use crate::domain::{BookingStatus, DeliverableStatus, PaymentStatus};

/// Color for any status missing from a table.
pub const FALLBACK_COLOR: &str = "#9ca3af";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Days a booking in `status` is expected to need before its deadline.
pub fn estimated_completion_days(status: BookingStatus) -> i64 {
    match status {
        BookingStatus::Pending => 7,
        BookingStatus::InProcess => 14,
        BookingStatus::ContentSubmitted => 3,
        BookingStatus::Approved => 1,
        BookingStatus::Completed | BookingStatus::Canceled => 0,
        BookingStatus::Unknown => 7,
    }
}

/// Projected deadline: `created_at` plus the status-dependent estimate.
pub fn projected_deadline(status: BookingStatus, created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at
        .checked_add_signed(Duration::days(estimated_completion_days(status)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn booking_priority(status: BookingStatus) -> EventPriority {
    match status {
        BookingStatus::ContentSubmitted => EventPriority::High,
        BookingStatus::Approved => EventPriority::Urgent,
        BookingStatus::InProcess => EventPriority::Medium,
        _ => EventPriority::Low,
    }
}

/// Whole days from `now` until `due`, rounded up.
///
/// Anything less than a full day overdue rounds to 0, matching a ceiling on
/// the signed millisecond delta.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = due.signed_duration_since(now).num_milliseconds();
    let days = ms / DAY_MS;
    if ms % DAY_MS > 0 {
        days + 1
    } else {
        days
    }
}

/// Priority tier for something due at `due`.
pub fn deliverable_priority(due: DateTime<Utc>, now: DateTime<Utc>) -> EventPriority {
    match days_until(due, now) {
        d if d < 0 => EventPriority::Urgent,
        0..=1 => EventPriority::High,
        2..=3 => EventPriority::Medium,
        _ => EventPriority::Low,
    }
}

pub fn booking_event_status(
    status: BookingStatus,
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EventStatus {
    match status {
        BookingStatus::Completed => EventStatus::Completed,
        BookingStatus::Canceled => EventStatus::Cancelled,
        _ if deadline < now => EventStatus::Overdue,
        BookingStatus::InProcess => EventStatus::InProgress,
        _ => EventStatus::Scheduled,
    }
}

pub fn deliverable_event_status(
    status: DeliverableStatus,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EventStatus {
    match status {
        DeliverableStatus::Posted | DeliverableStatus::Approved => EventStatus::Completed,
        DeliverableStatus::Submitted => EventStatus::InProgress,
        _ if due < now => EventStatus::Overdue,
        _ => EventStatus::Scheduled,
    }
}

pub fn payment_event_status(
    status: PaymentStatus,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EventStatus {
    match status {
        PaymentStatus::Paid => EventStatus::Completed,
        PaymentStatus::Canceled => EventStatus::Cancelled,
        PaymentStatus::Processing => EventStatus::InProgress,
        _ if due < now => EventStatus::Overdue,
        _ => EventStatus::Scheduled,
    }
}

/// Payments use the deliverable day scale; a failed payout is always urgent.
pub fn payment_priority(
    status: PaymentStatus,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EventPriority {
    match status {
        PaymentStatus::Failed => EventPriority::Urgent,
        _ => deliverable_priority(due, now),
    }
}

pub fn booking_color(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "#f59e0b",
        BookingStatus::InProcess => "#3b82f6",
        BookingStatus::ContentSubmitted => "#8b5cf6",
        BookingStatus::Approved => "#10b981",
        BookingStatus::Completed => "#059669",
        BookingStatus::Canceled => "#ef4444",
        BookingStatus::Unknown => FALLBACK_COLOR,
    }
}

pub fn deliverable_color(status: DeliverableStatus) -> &'static str {
    match status {
        DeliverableStatus::Planned => "#6366f1",
        DeliverableStatus::Due => "#f97316",
        DeliverableStatus::Submitted => "#8b5cf6",
        DeliverableStatus::Revision => "#eab308",
        DeliverableStatus::Approved => "#10b981",
        DeliverableStatus::Scheduled => "#06b6d4",
        DeliverableStatus::Posted => "#059669",
        DeliverableStatus::Unknown => FALLBACK_COLOR,
    }
}

pub fn payment_color(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "#f59e0b",
        PaymentStatus::Processing => "#3b82f6",
        PaymentStatus::Paid => "#059669",
        PaymentStatus::Failed => "#dc2626",
        PaymentStatus::Canceled => "#ef4444",
        PaymentStatus::Unknown => FALLBACK_COLOR,
    }
}
