//! Source records owned by the booking store.
//!
//! The calendar engine only reads these. Status enums carry an `Unknown`
//! catch-all so a status added upstream never breaks deserialization.

mod booking;
mod deliverable;
mod payment;

use serde::{Deserialize, Serialize};

pub use booking::{Booking, BookingStatus};
pub use deliverable::{Deliverable, DeliverableStatus};
pub use payment::{Payment, PaymentStatus};

/// A creator (influencer) who can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
}

/// A marketing campaign that bookings belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
}
