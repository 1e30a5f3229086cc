use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Published after a write to a source record.
///
/// Calendar events are never patched in place; views that cache them listen
/// for these and drop whatever they hold for the named source id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalendarNotice {
    DeliverableRescheduled {
        deliverable_id: String,
        due_date: DateTime<Utc>,
        at: DateTime<Utc>,
    },
}

impl CalendarNotice {
    /// Source id whose derived events are now stale.
    pub fn source_id(&self) -> &str {
        match self {
            Self::DeliverableRescheduled { deliverable_id, .. } => deliverable_id,
        }
    }
}
