//! SQLite-backed record store.
//!
//! Provides persistent storage for:
//! - Creators and campaigns (display names joined into records)
//! - Bookings, deliverables and payments read by the calendar engine
//! - Bulk import of a JSON record bundle
//!
//! Timestamps are stored as fixed-width RFC3339 UTC strings
//! (`2024-01-01T00:00:00.000Z`) so window filters can compare text.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{migrations, Config};
use crate::calendar::DateWindow;
use crate::domain::{
    Booking, BookingStatus, Campaign, Creator, Deliverable, DeliverableStatus, Payment,
    PaymentStatus,
};
use crate::error::{CoreError, DatabaseError, Result};
use crate::source::RecordSource;

// === Helper Functions ===

/// Format a timestamp for storage.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_ts(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_ts(idx, &s)).transpose()
}

/// `WHERE` fragment restricting `column` to `window`, with its parameters.
fn window_clause(column: &str, window: &DateWindow) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    if let Some(start) = window.start {
        conditions.push(format!("{column} >= ?{}", params.len() + 1));
        params.push(format_ts(start));
    }
    if let Some(end) = window.end {
        conditions.push(format!("{column} <= ?{}", params.len() + 1));
        params.push(format_ts(end));
    }
    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

fn row_to_booking(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    Ok(Booking {
        id: row.get(0)?,
        status: BookingStatus::parse(&status),
        created_at: parse_ts(2, &created_at)?,
        campaign_id: row.get(3)?,
        creator_id: row.get(4)?,
        campaign_name: row.get(5)?,
        creator_name: row.get(6)?,
    })
}

fn row_to_deliverable(row: &rusqlite::Row) -> rusqlite::Result<Deliverable> {
    let status: String = row.get(3)?;
    Ok(Deliverable {
        id: row.get(0)?,
        title: row.get(1)?,
        platform: row.get(2)?,
        status: DeliverableStatus::parse(&status),
        due_date: parse_opt_ts(4, row.get(4)?)?,
        publish_date: parse_opt_ts(5, row.get(5)?)?,
        booking_id: row.get(6)?,
        campaign_id: row.get(7)?,
        creator_id: row.get(8)?,
        campaign_name: row.get(9)?,
        creator_name: row.get(10)?,
        updated_at: parse_opt_ts(11, row.get(11)?)?,
    })
}

fn row_to_payment(row: &rusqlite::Row) -> rusqlite::Result<Payment> {
    let status: String = row.get(7)?;
    Ok(Payment {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        creator_id: row.get(2)?,
        campaign_id: row.get(3)?,
        creator_name: row.get(4)?,
        amount_cents: row.get(5)?,
        currency: row.get(6)?,
        status: PaymentStatus::parse(&status),
        due_date: parse_opt_ts(8, row.get(8)?)?,
    })
}

const BOOKING_SELECT: &str = "SELECT b.id, b.status, b.created_at, b.campaign_id, b.creator_id,
            k.name, c.name
     FROM bookings b
     LEFT JOIN campaigns k ON k.id = b.campaign_id
     LEFT JOIN creators c ON c.id = b.creator_id";

const DELIVERABLE_SELECT: &str = "SELECT d.id, d.title, d.platform, d.status, d.due_date,
            d.publish_date, d.booking_id, b.campaign_id, b.creator_id, k.name, c.name,
            d.updated_at
     FROM deliverables d
     LEFT JOIN bookings b ON b.id = d.booking_id
     LEFT JOIN campaigns k ON k.id = b.campaign_id
     LEFT JOIN creators c ON c.id = b.creator_id";

const PAYMENT_SELECT: &str = "SELECT p.id, p.booking_id, b.creator_id, b.campaign_id, c.name,
            p.amount_cents, p.currency, p.status, p.due_date
     FROM payments p
     LEFT JOIN bookings b ON b.id = p.booking_id
     LEFT JOIN creators c ON c.id = b.creator_id";

fn query_bookings(conn: &Connection, window: &DateWindow) -> rusqlite::Result<Vec<Booking>> {
    let (clause, args) = window_clause("b.created_at", window);
    let sql = format!("{BOOKING_SELECT} {clause} ORDER BY b.created_at, b.id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), row_to_booking)?;
    rows.collect()
}

fn query_deliverables(
    conn: &Connection,
    window: &DateWindow,
) -> rusqlite::Result<Vec<Deliverable>> {
    let (clause, args) = window_clause("d.due_date", window);
    let sql = format!("{DELIVERABLE_SELECT} {clause} ORDER BY d.due_date, d.id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), row_to_deliverable)?;
    rows.collect()
}

fn query_payments(conn: &Connection, window: &DateWindow) -> rusqlite::Result<Vec<Payment>> {
    let (clause, args) = window_clause("p.due_date", window);
    let sql = format!("{PAYMENT_SELECT} {clause} ORDER BY p.due_date, p.id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), row_to_payment)?;
    rows.collect()
}

/// A batch of records to load into the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportBundle {
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub creators: usize,
    pub campaigns: usize,
    pub bookings: usize,
    pub deliverables: usize,
    pub payments: usize,
}

/// SQLite record store.
///
/// The connection sits behind a mutex so async reads can run it on the
/// blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open the database configured in `config`.
    pub fn open_configured(config: &Config) -> Result<Self> {
        Self::open(&config.database_path()?)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DatabaseError::Worker("connection lock poisoned".into()).into())
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.lock()?;
            f(&conn)
        })
        .await?
    }

    pub fn upsert_creator(&self, creator: &Creator) -> Result<()> {
        let conn = self.lock()?;
        upsert_creator(&conn, creator)
    }

    pub fn upsert_campaign(&self, campaign: &Campaign) -> Result<()> {
        let conn = self.lock()?;
        upsert_campaign(&conn, campaign)
    }

    pub fn upsert_booking(&self, booking: &Booking) -> Result<()> {
        let conn = self.lock()?;
        upsert_booking(&conn, booking)
    }

    pub fn upsert_deliverable(&self, deliverable: &Deliverable) -> Result<()> {
        let conn = self.lock()?;
        upsert_deliverable(&conn, deliverable)
    }

    pub fn upsert_payment(&self, payment: &Payment) -> Result<()> {
        let conn = self.lock()?;
        upsert_payment(&conn, payment)
    }

    /// Upsert every record in `bundle` in one transaction.
    pub fn import(&self, bundle: &ImportBundle) -> Result<ImportSummary> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for creator in &bundle.creators {
            upsert_creator(&tx, creator)?;
        }
        for campaign in &bundle.campaigns {
            upsert_campaign(&tx, campaign)?;
        }
        for booking in &bundle.bookings {
            upsert_booking(&tx, booking)?;
        }
        for deliverable in &bundle.deliverables {
            upsert_deliverable(&tx, deliverable)?;
        }
        for payment in &bundle.payments {
            upsert_payment(&tx, payment)?;
        }
        tx.commit()?;

        let summary = ImportSummary {
            creators: bundle.creators.len(),
            campaigns: bundle.campaigns.len(),
            bookings: bundle.bookings.len(),
            deliverables: bundle.deliverables.len(),
            payments: bundle.payments.len(),
        };
        tracing::info!(?summary, "imported records");
        Ok(summary)
    }

    /// Look up a deliverable by id, with booking-derived fields joined in.
    pub fn deliverable(&self, id: &str) -> Result<Option<Deliverable>> {
        let conn = self.lock()?;
        let sql = format!("{DELIVERABLE_SELECT} WHERE d.id = ?1");
        let found = conn
            .query_row(&sql, params![id], row_to_deliverable)
            .optional()?;
        Ok(found)
    }
}

fn upsert_creator(conn: &Connection, creator: &Creator) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO creators (id, name, handle) VALUES (?1, ?2, ?3)",
        params![creator.id, creator.name, creator.handle],
    )?;
    Ok(())
}

fn upsert_campaign(conn: &Connection, campaign: &Campaign) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO campaigns (id, name, brand) VALUES (?1, ?2, ?3)",
        params![campaign.id, campaign.name, campaign.brand],
    )?;
    Ok(())
}

fn upsert_booking(conn: &Connection, booking: &Booking) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO bookings (id, status, created_at, campaign_id, creator_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            booking.id,
            booking.status.as_str(),
            format_ts(booking.created_at),
            booking.campaign_id,
            booking.creator_id,
        ],
    )?;
    Ok(())
}

fn upsert_deliverable(conn: &Connection, deliverable: &Deliverable) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO deliverables
            (id, title, platform, status, due_date, publish_date, booking_id, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            deliverable.id,
            deliverable.title,
            deliverable.platform,
            deliverable.status.as_str(),
            deliverable.due_date.map(format_ts),
            deliverable.publish_date.map(format_ts),
            deliverable.booking_id,
            deliverable.updated_at.map(format_ts),
        ],
    )?;
    Ok(())
}

fn upsert_payment(conn: &Connection, payment: &Payment) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO payments
            (id, booking_id, amount_cents, currency, status, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            payment.id,
            payment.booking_id,
            payment.amount_cents,
            payment.currency,
            payment.status.as_str(),
            payment.due_date.map(format_ts),
        ],
    )?;
    Ok(())
}

#[async_trait]
impl RecordSource for SqliteStore {
    async fn fetch_bookings(&self, window: &DateWindow) -> Result<Vec<Booking>> {
        let window = *window;
        self.run_blocking(move |conn| Ok(query_bookings(conn, &window)?))
            .await
    }

    async fn fetch_deliverables(&self, window: &DateWindow) -> Result<Vec<Deliverable>> {
        let window = *window;
        self.run_blocking(move |conn| Ok(query_deliverables(conn, &window)?))
            .await
    }

    async fn fetch_payments(&self, window: &DateWindow) -> Result<Vec<Payment>> {
        let window = *window;
        self.run_blocking(move |conn| Ok(query_payments(conn, &window)?))
            .await
    }

    async fn update_deliverable_due_date(
        &self,
        deliverable_id: &str,
        due_date: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let id = deliverable_id.to_string();
        self.run_blocking(move |conn| {
            let changed = conn.execute(
                "UPDATE deliverables SET due_date = ?1, updated_at = ?2 WHERE id = ?3",
                params![format_ts(due_date), format_ts(updated_at), id],
            )?;
            if changed == 0 {
                return Err(CoreError::NotFound {
                    kind: "deliverable",
                    id,
                });
            }
            Ok(())
        })
        .await
    }
}
