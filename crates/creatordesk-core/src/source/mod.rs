//! Read access to the booking store.
//!
//! The calendar engine never owns records. It asks a [`RecordSource`] for
//! them, optionally pushing a date window down so the store can filter on
//! each record's own timestamp.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::calendar::DateWindow;
use crate::domain::{Booking, Deliverable, Payment};
use crate::error::Result;

pub use memory::MemorySource;

/// Every store the engine can read from implements this trait.
///
/// Window semantics are per record kind: bookings filter on `created_at`,
/// deliverables and payments on `due_date`. Records with no due date fall
/// outside any bounded window.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_bookings(&self, window: &DateWindow) -> Result<Vec<Booking>>;

    async fn fetch_deliverables(&self, window: &DateWindow) -> Result<Vec<Deliverable>>;

    async fn fetch_payments(&self, window: &DateWindow) -> Result<Vec<Payment>>;

    /// Overwrite a deliverable's due date and stamp `updated_at`.
    ///
    /// Returns `CoreError::NotFound` when the deliverable does not exist.
    async fn update_deliverable_due_date(
        &self,
        deliverable_id: &str,
        due_date: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// Whether an optional timestamp falls inside `window`.
///
/// A missing timestamp only matches an unbounded window.
pub(crate) fn window_admits(window: &DateWindow, ts: Option<DateTime<Utc>>) -> bool {
    match ts {
        Some(ts) => window.contains(ts),
        None => window.is_unbounded(),
    }
}
