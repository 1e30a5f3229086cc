use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Optional inclusive `[start, end]` bounds on a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// No bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// `[from, from + days]`, or an error if the end is out of range.
    pub fn days_from(from: DateTime<Utc>, days: i64) -> Result<Self, ValidationError> {
        let end = Duration::try_days(days)
            .and_then(|d| from.checked_add_signed(d))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "days".into(),
                message: format!("{days} days from {from} is out of range"),
            })?;
        Ok(Self::between(from, end))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }

    /// Reject windows whose end precedes their start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(ValidationError::InvalidTimeRange { start, end })
            }
            _ => Ok(()),
        }
    }

    /// Fill in whichever bounds are missing from `defaults`.
    pub fn or(self, defaults: DateWindow) -> Self {
        Self {
            start: self.start.or(defaults.start),
            end: self.end.or(defaults.end),
        }
    }
}
