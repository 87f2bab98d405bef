//! SQLite-backed item store.
//!
//! Backed by a single database file at `{root_dir}/pantry.db`. Thread-safe
//! via an internal `Mutex<Connection>`: all writes are serialized; reads
//! could proceed concurrently under WAL, but we still take the mutex for
//! simplicity.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{Connection, params};

use super::ItemStore;
use super::schema::{apply_schema, read_schema_version};
use crate::error::{PantryError, Result};
use crate::item::PantryItem;

/// Database filename within the store root directory.
const DB_FILENAME: &str = "pantry.db";

const ITEM_COLUMNS: &str = "id, name, notes, expiration_date, flagged, \
     notification_date, notification_sent, refrigerated, icon_name";

/// SQLite-backed [`ItemStore`].
pub struct SqliteItemStore {
    root: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) the database at `{root_dir}/pantry.db`.
    ///
    /// Applies the schema if the database is new.
    pub fn new(root_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(root_dir)?;
        let db_path = root_dir.join(DB_FILENAME);
        let conn = Connection::open(&db_path).map_err(storage_err)?;
        apply_schema(&conn).map_err(storage_err)?;
        Ok(Self {
            root: root_dir.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let conn = self.lock()?;
        read_schema_version(&conn).map_err(storage_err)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PantryError::Storage("store lock poisoned".to_owned()))
    }
}

impl ItemStore for SqliteItemStore {
    fn list_all(&self) -> Result<Vec<PantryItem>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY expiration_date ASC, id ASC");
        let mut stmt = conn.prepare(&sql).map_err(storage_err)?;
        let rows = stmt.query_map([], row_to_item).map_err(storage_err)?;

        let mut items = Vec::new();
        for r in rows {
            items.push(r.map_err(storage_err)?);
        }
        Ok(items)
    }

    fn get(&self, id: i64) -> Result<Option<PantryItem>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let mut stmt = conn.prepare(&sql).map_err(storage_err)?;
        let mut rows = stmt.query_map(params![id], row_to_item).map_err(storage_err)?;
        match rows.next() {
            Some(item) => Ok(Some(item.map_err(storage_err)?)),
            None => Ok(None),
        }
    }

    fn save(&self, mut item: PantryItem) -> Result<PantryItem> {
        let conn = self.lock()?;
        let expiration = item.expiration_date.to_string();
        let notification = item.notification_date.map(|d| d.to_string());

        match item.id {
            Some(id) => {
                let rows = conn
                    .execute(
                        "UPDATE items SET name = ?1, notes = ?2, expiration_date = ?3, \
                         flagged = ?4, notification_date = ?5, notification_sent = ?6, \
                         refrigerated = ?7, icon_name = ?8 WHERE id = ?9",
                        params![
                            item.name,
                            item.notes,
                            expiration,
                            item.flagged,
                            notification,
                            item.notification_sent,
                            item.refrigerated,
                            item.icon_name,
                            id
                        ],
                    )
                    .map_err(storage_err)?;

                // Upsert semantics: a save with an id that no longer exists
                // re-inserts the row under that id.
                if rows == 0 {
                    conn.execute(
                        "INSERT INTO items (id, name, notes, expiration_date, flagged, \
                         notification_date, notification_sent, refrigerated, icon_name) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                        params![
                            id,
                            item.name,
                            item.notes,
                            expiration,
                            item.flagged,
                            notification,
                            item.notification_sent,
                            item.refrigerated,
                            item.icon_name
                        ],
                    )
                    .map_err(storage_err)?;
                }
            }
            None => {
                conn.execute(
                    "INSERT INTO items (name, notes, expiration_date, flagged, \
                     notification_date, notification_sent, refrigerated, icon_name) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        item.name,
                        item.notes,
                        expiration,
                        item.flagged,
                        notification,
                        item.notification_sent,
                        item.refrigerated,
                        item.icon_name
                    ],
                )
                .map_err(storage_err)?;
                item.id = Some(conn.last_insert_rowid());
            }
        }

        Ok(item)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(rows > 0)
    }

    fn list_notification_due(&self, today: NaiveDate) -> Result<Vec<PantryItem>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE notification_date IS NOT NULL \
               AND notification_sent = 0 \
               AND notification_date <= ?1 \
             ORDER BY notification_date ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql).map_err(storage_err)?;
        let rows = stmt
            .query_map(params![today.to_string()], row_to_item)
            .map_err(storage_err)?;

        let mut items = Vec::new();
        for r in rows {
            items.push(r.map_err(storage_err)?);
        }
        Ok(items)
    }

    fn mark_notification_sent(&self, id: i64, expected_date: NaiveDate) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "UPDATE items SET notification_sent = 1 \
                 WHERE id = ?1 AND notification_date = ?2 AND notification_sent = 0",
                params![id, expected_date.to_string()],
            )
            .map_err(storage_err)?;
        Ok(rows > 0)
    }
}

fn storage_err(e: rusqlite::Error) -> PantryError {
    PantryError::Storage(e.to_string())
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<PantryItem> {
    let expiration: String = row.get(3)?;
    let notification: Option<String> = row.get(5)?;

    Ok(PantryItem {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        notes: row.get(2)?,
        expiration_date: parse_date(&expiration, 3)?,
        flagged: row.get(4)?,
        notification_date: match notification {
            Some(text) => Some(parse_date(&text, 5)?),
            None => None,
        },
        notification_sent: row.get(6)?,
        refrigerated: row.get(7)?,
        icon_name: row.get(8)?,
    })
}

fn parse_date(text: &str, column: usize) -> rusqlite::Result<NaiveDate> {
    text.parse().map_err(|e: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::store::schema::CURRENT_SCHEMA_VERSION;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_store() -> (tempfile::TempDir, SqliteItemStore) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let store = SqliteItemStore::new(dir.path()).expect("create SqliteItemStore");
        (dir, store)
    }

    fn seeded_item(store: &SqliteItemStore, name: &str, notification: NaiveDate) -> PantryItem {
        let mut item = PantryItem::new(name, date(2026, 3, 10));
        item.notification_date = Some(notification);
        store.save(item).expect("save")
    }

    #[test]
    fn open_creates_schema() {
        let (_dir, store) = test_store();
        let version = store.schema_version().expect("schema_version");
        assert_eq!(version, Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn save_assigns_id_and_get_round_trips() {
        let (_dir, store) = test_store();
        let mut item = PantryItem::new("Milk", date(2026, 3, 10));
        item.notes = "oat".to_owned();
        item.refrigerated = true;

        let saved = store.save(item).expect("save");
        let id = saved.id.expect("id assigned");

        let fetched = store.get(id).expect("get").expect("present");
        assert_eq!(fetched, saved);
    }

    #[test]
    fn save_with_existing_id_updates_in_place() {
        let (_dir, store) = test_store();
        let saved = seeded_item(&store, "Milk", date(2026, 3, 1));
        let id = saved.id.unwrap();

        let mut edited = saved;
        edited.name = "Whole milk".to_owned();
        edited.flagged = true;
        store.save(edited).expect("update");

        let all = store.list_all().expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Whole milk");
        assert_eq!(all[0].id, Some(id));
    }

    #[test]
    fn save_with_vanished_id_reinserts() {
        let (_dir, store) = test_store();
        let saved = seeded_item(&store, "Milk", date(2026, 3, 1));
        let id = saved.id.unwrap();

        assert!(store.delete(id).expect("delete"));
        let restored = store.save(saved.clone()).expect("re-save");
        assert_eq!(restored.id, Some(id));
        assert!(store.get(id).expect("get").is_some());
    }

    #[test]
    fn delete_missing_returns_false() {
        let (_dir, store) = test_store();
        assert!(!store.delete(42).expect("delete"));
    }

    #[test]
    fn list_all_orders_by_expiration() {
        let (_dir, store) = test_store();
        let mut later = PantryItem::new("Flour", date(2026, 9, 1));
        later.notification_date = None;
        store.save(later).expect("save");
        let mut sooner = PantryItem::new("Milk", date(2026, 3, 10));
        sooner.notification_date = None;
        store.save(sooner).expect("save");

        let all = store.list_all().expect("list");
        assert_eq!(all[0].name, "Milk");
        assert_eq!(all[1].name, "Flour");
    }

    #[test]
    fn due_query_matches_the_pure_predicate() {
        let (_dir, store) = test_store();
        let today = date(2026, 3, 1);

        seeded_item(&store, "due today", today);
        seeded_item(&store, "overdue", date(2026, 2, 20));
        seeded_item(&store, "future", date(2026, 3, 5));
        let sent = seeded_item(&store, "already sent", date(2026, 2, 1));
        store
            .mark_notification_sent(sent.id.unwrap(), date(2026, 2, 1))
            .expect("mark");
        let mut no_date = PantryItem::new("no reminder", date(2026, 3, 10));
        no_date.notification_date = None;
        store.save(no_date).expect("save");

        let due = store.list_notification_due(today).expect("due");
        let due_names: Vec<&str> = due.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(due_names, vec!["overdue", "due today"]);

        let filtered: Vec<PantryItem> = store
            .list_all()
            .expect("list")
            .into_iter()
            .filter(|i| i.is_notification_due(today))
            .collect();
        let mut expected = filtered;
        expected.sort_by_key(|i| (i.notification_date, i.id));
        assert_eq!(due, expected);
    }

    #[test]
    fn conditional_mark_applies_on_matching_date() {
        let (_dir, store) = test_store();
        let saved = seeded_item(&store, "Milk", date(2026, 3, 1));
        let id = saved.id.unwrap();

        assert!(
            store
                .mark_notification_sent(id, date(2026, 3, 1))
                .expect("mark")
        );
        let fetched = store.get(id).expect("get").expect("present");
        assert!(fetched.notification_sent);
    }

    #[test]
    fn conditional_mark_refuses_on_date_mismatch() {
        let (_dir, store) = test_store();
        let saved = seeded_item(&store, "Milk", date(2026, 3, 5));
        let id = saved.id.unwrap();

        assert!(
            !store
                .mark_notification_sent(id, date(2026, 3, 1))
                .expect("mark")
        );
        let fetched = store.get(id).expect("get").expect("present");
        assert!(!fetched.notification_sent);
    }

    #[test]
    fn conditional_mark_refuses_on_missing_row() {
        let (_dir, store) = test_store();
        assert!(
            !store
                .mark_notification_sent(99, date(2026, 3, 1))
                .expect("mark")
        );
    }

    #[test]
    fn conditional_mark_refuses_when_already_sent() {
        let (_dir, store) = test_store();
        let saved = seeded_item(&store, "Milk", date(2026, 3, 1));
        let id = saved.id.unwrap();

        assert!(store.mark_notification_sent(id, date(2026, 3, 1)).unwrap());
        assert!(!store.mark_notification_sent(id, date(2026, 3, 1)).unwrap());
    }

    #[test]
    fn concurrent_saves_preserve_all_rows() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = std::sync::Arc::new(SqliteItemStore::new(dir.path()).expect("create store"));

        let mut handles = Vec::new();
        for i in 0..10 {
            let s = std::sync::Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                s.save(PantryItem::new(format!("item {i}"), date(2026, 3, 10)))
                    .expect("concurrent save");
            }));
        }
        for h in handles {
            h.join().expect("thread join");
        }

        assert_eq!(store.list_all().expect("list").len(), 10);
    }
}
