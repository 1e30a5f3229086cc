use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    InProcess,
    ContentSubmitted,
    Approved,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Parse a stored status string. Unrecognized values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "in_process" => Self::InProcess,
            "content_submitted" => Self::ContentSubmitted,
            "approved" => Self::Approved,
            "completed" => Self::Completed,
            "canceled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProcess => "in_process",
            Self::ContentSubmitted => "content_submitted",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// A creator booked for a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    /// Joined from the campaigns table.
    #[serde(default)]
    pub campaign_name: Option<String>,
    /// Joined from the creators table.
    #[serde(default)]
    pub creator_name: Option<String>,
}

impl Booking {
    pub fn new(id: impl Into<String>, status: BookingStatus, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status,
            created_at,
            campaign_id: None,
            creator_id: None,
            campaign_name: None,
            creator_name: None,
        }
    }

    pub fn with_creator(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.creator_id = Some(id.into());
        self.creator_name = Some(name.into());
        self
    }

    pub fn with_campaign(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.campaign_id = Some(id.into());
        self.campaign_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_deserializes() {
        let status: BookingStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, BookingStatus::Unknown);
        assert_eq!(BookingStatus::parse("on_hold"), BookingStatus::Unknown);
    }

    #[test]
    fn status_strings_match_store() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::InProcess,
            BookingStatus::ContentSubmitted,
            BookingStatus::Approved,
            BookingStatus::Completed,
            BookingStatus::Canceled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
