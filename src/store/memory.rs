//! In-memory item store.
//!
//! Same contract as the SQLite backend, held in a `Mutex<BTreeMap>`. Used
//! by unit and scenario tests, and handy for throwaway setups that don't
//! want a database file.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use super::ItemStore;
use crate::error::{PantryError, Result};
use crate::item::PantryItem;

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<i64, PantryItem>,
    next_id: i64,
}

/// In-memory [`ItemStore`].
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    inner: Mutex<Inner>,
}

impl MemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PantryError::Storage("store lock poisoned".to_owned()))
    }
}

impl ItemStore for MemoryItemStore {
    fn list_all(&self) -> Result<Vec<PantryItem>> {
        let inner = self.lock()?;
        let mut items: Vec<PantryItem> = inner.items.values().cloned().collect();
        items.sort_by_key(|item| (item.expiration_date, item.id));
        Ok(items)
    }

    fn get(&self, id: i64) -> Result<Option<PantryItem>> {
        let inner = self.lock()?;
        Ok(inner.items.get(&id).cloned())
    }

    fn save(&self, mut item: PantryItem) -> Result<PantryItem> {
        let mut inner = self.lock()?;
        let id = match item.id {
            Some(id) => {
                inner.next_id = inner.next_id.max(id);
                id
            }
            None => {
                inner.next_id += 1;
                inner.next_id
            }
        };
        item.id = Some(id);
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        Ok(inner.items.remove(&id).is_some())
    }

    fn list_notification_due(&self, today: NaiveDate) -> Result<Vec<PantryItem>> {
        let inner = self.lock()?;
        let mut due: Vec<PantryItem> = inner
            .items
            .values()
            .filter(|item| item.is_notification_due(today))
            .cloned()
            .collect();
        due.sort_by_key(|item| (item.notification_date, item.id));
        Ok(due)
    }

    fn mark_notification_sent(&self, id: i64, expected_date: NaiveDate) -> Result<bool> {
        let mut inner = self.lock()?;
        match inner.items.get_mut(&id) {
            Some(item)
                if item.notification_date == Some(expected_date) && !item.notification_sent =>
            {
                item.notification_sent = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
