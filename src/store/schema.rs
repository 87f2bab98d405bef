//! SQLite DDL for the pantry item store.
//!
//! All `CREATE TABLE` / `CREATE INDEX` statements live here so they are
//! reviewable and testable in isolation.

use rusqlite::Connection;

/// Current schema version, stamped into `schema_meta` on first open.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Complete DDL for the pantry database.
///
/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent. Dates
/// are stored as ISO-8601 text, which compares chronologically under
/// SQLite's ordinary text collation.
pub(crate) const SCHEMA_SQL: &str = r#"
-- Enable WAL mode for concurrent reads during writes.
PRAGMA journal_mode = WAL;

-- Schema version tracking.
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Pantry items — mirrors PantryItem fields.
CREATE TABLE IF NOT EXISTS items (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    notes             TEXT NOT NULL DEFAULT '',
    expiration_date   TEXT NOT NULL,              -- ISO-8601 calendar date
    flagged           INTEGER NOT NULL DEFAULT 0,
    notification_date TEXT,                       -- ISO-8601 calendar date
    notification_sent INTEGER NOT NULL DEFAULT 0,
    refrigerated      INTEGER NOT NULL DEFAULT 0,
    icon_name         TEXT NOT NULL DEFAULT 'utensils'
);

-- List views sort by expiration; the dispatch cycle filters on the
-- notification pair.
CREATE INDEX IF NOT EXISTS idx_items_expiration   ON items(expiration_date);
CREATE INDEX IF NOT EXISTS idx_items_notification ON items(notification_date, notification_sent);
"#;

/// Apply the full schema to an open connection.
///
/// Safe to call multiple times — all statements use `IF NOT EXISTS`.
/// Seeds the schema version into `schema_meta` on a fresh database.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let version_str = CURRENT_SCHEMA_VERSION.to_string();
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![version_str],
    )?;

    Ok(())
}

/// Read the current schema version from the database.
///
/// Returns `None` if the `schema_meta` table is empty or the key is missing.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().ok())
        }
        None => Ok(None),
    }
}
