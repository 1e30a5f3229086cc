//! Mapping a reschedule request back onto a source record.
//!
//! Only deliverables have a write path (their due date). Every other event
//! kind is derived from state that has no date to move, so those requests
//! fail instead of silently doing nothing.

use chrono::{DateTime, Utc};

use super::event::EventRef;
use super::window::DateWindow;
use crate::error::{RescheduleError, Result};

/// The store write a reschedule request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleTarget {
    DeliverableDueDate {
        deliverable_id: String,
        due_date: DateTime<Utc>,
    },
}

/// Validate a reschedule request and resolve it to a store write.
pub fn plan_reschedule(
    event_id: &str,
    new_start: DateTime<Utc>,
    new_end: Option<DateTime<Utc>>,
) -> Result<RescheduleTarget> {
    let event_ref = EventRef::parse(event_id)
        .ok_or_else(|| RescheduleError::UnrecognizedEventId(event_id.to_string()))?;

    DateWindow::new(Some(new_start), new_end).validate()?;

    match event_ref {
        EventRef::Deliverable(deliverable_id) => Ok(RescheduleTarget::DeliverableDueDate {
            deliverable_id,
            due_date: new_start,
        }),
        other => Err(RescheduleError::Unsupported {
            kind: other.event_type(),
            event_id: event_id.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventType;
    use crate::error::{CoreError, ValidationError};
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn booking_deadlines_cannot_move() {
        let err = plan_reschedule("booking-deadline-xyz", at(2024, 1, 1), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Reschedule(RescheduleError::Unsupported {
                kind: EventType::BookingDeadline,
                ..
            })
        ));
    }

    #[test]
    fn approvals_and_payments_cannot_move() {
        for id in ["booking-approval-b1", "payment-p1"] {
            let err = plan_reschedule(id, at(2024, 1, 1), None).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Reschedule(RescheduleError::Unsupported { .. })
            ));
        }
    }

    #[test]
    fn deliverables_resolve_to_due_date_write() {
        let target = plan_reschedule("deliverable-d1", at(2024, 2, 1), None).unwrap();
        assert_eq!(
            target,
            RescheduleTarget::DeliverableDueDate {
                deliverable_id: "d1".into(),
                due_date: at(2024, 2, 1),
            }
        );
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let err = plan_reschedule("meeting-42", at(2024, 1, 1), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Reschedule(RescheduleError::UnrecognizedEventId(_))
        ));
    }

    #[test]
    fn end_before_start_is_invalid() {
        let start = at(2024, 2, 1);
        let err =
            plan_reschedule("deliverable-d1", start, Some(start - Duration::days(1))).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidTimeRange { .. })
        ));
    }
}
