//! Item record store: the storage contract plus its backends.
//!
//! The dispatch cycle and the item service only ever talk to [`ItemStore`];
//! the SQLite backend is the production store, the in-memory backend backs
//! tests and throwaway setups.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryItemStore;
pub use sqlite::SqliteItemStore;

use chrono::NaiveDate;

use crate::error::Result;
use crate::item::PantryItem;

/// Storage contract for pantry item records.
///
/// Implementations are internally synchronized; all methods take `&self`.
pub trait ItemStore: Send + Sync {
    /// All items, ordered by expiration date ascending.
    fn list_all(&self) -> Result<Vec<PantryItem>>;

    /// Fetch a single item by id.
    fn get(&self, id: i64) -> Result<Option<PantryItem>>;

    /// Upsert an item. Assigns and returns the id on first save.
    fn save(&self, item: PantryItem) -> Result<PantryItem>;

    /// Delete an item. Returns whether a row was removed.
    fn delete(&self, id: i64) -> Result<bool>;

    /// Items with a pending reminder as of `today`.
    ///
    /// Must return exactly the records for which
    /// [`PantryItem::is_notification_due`] holds — the two are asserted
    /// equivalent by the scenario tests.
    fn list_notification_due(&self, today: NaiveDate) -> Result<Vec<PantryItem>>;

    /// Conditionally flip `notification_sent` to true.
    ///
    /// Applies only while the stored `notification_date` still equals
    /// `expected_date` and the flag is still unset; returns whether the
    /// write took effect. A `false` return means the record vanished or was
    /// re-armed concurrently, and the caller must not treat the reminder as
    /// recorded.
    fn mark_notification_sent(&self, id: i64, expected_date: NaiveDate) -> Result<bool>;
}
