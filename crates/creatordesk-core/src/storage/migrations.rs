//! Database schema migrations for creatordesk.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, or 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: creators, campaigns, bookings, deliverables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS creators (
            id      TEXT PRIMARY KEY,
            name    TEXT NOT NULL,
            handle  TEXT
        );

        CREATE TABLE IF NOT EXISTS campaigns (
            id      TEXT PRIMARY KEY,
            name    TEXT NOT NULL,
            brand   TEXT
        );

        CREATE TABLE IF NOT EXISTS bookings (
            id          TEXT PRIMARY KEY,
            status      TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            campaign_id TEXT REFERENCES campaigns(id),
            creator_id  TEXT REFERENCES creators(id)
        );

        CREATE TABLE IF NOT EXISTS deliverables (
            id           TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            platform     TEXT,
            status       TEXT NOT NULL,
            due_date     TEXT,
            publish_date TEXT,
            booking_id   TEXT REFERENCES bookings(id),
            updated_at   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_created_at ON bookings(created_at);
        CREATE INDEX IF NOT EXISTS idx_deliverables_due_date ON deliverables(due_date);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: creator payouts.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS payments (
            id           TEXT PRIMARY KEY,
            booking_id   TEXT REFERENCES bookings(id),
            amount_cents INTEGER NOT NULL,
            currency     TEXT NOT NULL DEFAULT 'USD',
            status       TEXT NOT NULL,
            due_date     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_payments_due_date ON payments(due_date);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'payments'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
