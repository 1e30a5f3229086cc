use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Production state of a single piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableStatus {
    Planned,
    Due,
    Submitted,
    Revision,
    Approved,
    Scheduled,
    Posted,
    #[serde(other)]
    Unknown,
}

impl DeliverableStatus {
    /// Parse a stored status string. Unrecognized values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "planned" => Self::Planned,
            "due" => Self::Due,
            "submitted" => Self::Submitted,
            "revision" => Self::Revision,
            "approved" => Self::Approved,
            "scheduled" => Self::Scheduled,
            "posted" => Self::Posted,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Due => "due",
            Self::Submitted => "submitted",
            Self::Revision => "revision",
            Self::Approved => "approved",
            Self::Scheduled => "scheduled",
            Self::Posted => "posted",
            Self::Unknown => "unknown",
        }
    }
}

/// Content a creator owes under a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: String,
    pub title: String,
    /// Publishing platform, e.g. "instagram" or "youtube".
    #[serde(default)]
    pub platform: Option<String>,
    pub status: DeliverableStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deliverable {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: DeliverableStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            platform: None,
            status,
            due_date: None,
            publish_date: None,
            booking_id: None,
            campaign_id: None,
            creator_id: None,
            campaign_name: None,
            creator_name: None,
            updated_at: None,
        }
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn published(mut self, publish_date: DateTime<Utc>) -> Self {
        self.publish_date = Some(publish_date);
        self
    }

    pub fn for_booking(mut self, booking_id: impl Into<String>) -> Self {
        self.booking_id = Some(booking_id.into());
        self
    }
}
