use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{window_admits, RecordSource};
use crate::calendar::DateWindow;
use crate::domain::{Booking, Deliverable, Payment};
use crate::error::{CoreError, Result};

/// In-process record store.
///
/// Useful for embedding the engine over data that is already loaded, and
/// as the store behind most tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    bookings: RwLock<Vec<Booking>>,
    deliverables: RwLock<Vec<Deliverable>>,
    payments: RwLock<Vec<Payment>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(
        bookings: Vec<Booking>,
        deliverables: Vec<Deliverable>,
        payments: Vec<Payment>,
    ) -> Self {
        Self {
            bookings: RwLock::new(bookings),
            deliverables: RwLock::new(deliverables),
            payments: RwLock::new(payments),
        }
    }

    pub fn insert_booking(&self, booking: Booking) -> Result<()> {
        self.bookings.write().map_err(poisoned)?.push(booking);
        Ok(())
    }

    pub fn insert_deliverable(&self, deliverable: Deliverable) -> Result<()> {
        self.deliverables.write().map_err(poisoned)?.push(deliverable);
        Ok(())
    }

    pub fn insert_payment(&self, payment: Payment) -> Result<()> {
        self.payments.write().map_err(poisoned)?.push(payment);
        Ok(())
    }

    /// Look up a deliverable by id.
    pub fn deliverable(&self, id: &str) -> Result<Option<Deliverable>> {
        let guard = self.deliverables.read().map_err(poisoned)?;
        Ok(guard.iter().find(|d| d.id == id).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::Custom("memory source lock poisoned".into())
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch_bookings(&self, window: &DateWindow) -> Result<Vec<Booking>> {
        let guard = self.bookings.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|b| window.contains(b.created_at))
            .cloned()
            .collect())
    }

    async fn fetch_deliverables(&self, window: &DateWindow) -> Result<Vec<Deliverable>> {
        let guard = self.deliverables.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|d| window_admits(window, d.due_date))
            .cloned()
            .collect())
    }

    async fn fetch_payments(&self, window: &DateWindow) -> Result<Vec<Payment>> {
        let guard = self.payments.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|p| window_admits(window, p.due_date))
            .cloned()
            .collect())
    }

    async fn update_deliverable_due_date(
        &self,
        deliverable_id: &str,
        due_date: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut guard = self.deliverables.write().map_err(poisoned)?;
        let deliverable = guard
            .iter_mut()
            .find(|d| d.id == deliverable_id)
            .ok_or_else(|| CoreError::NotFound {
                kind: "deliverable",
                id: deliverable_id.to_string(),
            })?;
        deliverable.due_date = Some(due_date);
        deliverable.updated_at = Some(updated_at);
        Ok(())
    }
}
