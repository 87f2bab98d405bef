//! The pantry item service.
//!
//! Every mutation path — add, edit, flag toggles — funnels through here so
//! the notification re-arm comparison happens exactly once, against a fresh
//! read of the persisted record. Icon classification rides along
//! opportunistically and never blocks a save.

use std::sync::Arc;

use tracing::debug;

use crate::classify::{FoodIcon, IconClassifier};
use crate::error::{PantryError, Result};
use crate::item::{DEFAULT_ICON_NAME, PantryItem, rearm_for_edit};
use crate::store::ItemStore;

/// Item CRUD facade over the store, with the re-arm chokepoint applied on
/// every write.
pub struct Pantry {
    store: Arc<dyn ItemStore>,
    classifier: Option<Arc<dyn IconClassifier>>,
}

impl Pantry {
    /// Create a service without icon classification.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            classifier: None,
        }
    }

    /// Attach an icon classifier for opportunistic suggestions.
    pub fn with_classifier(mut self, classifier: Arc<dyn IconClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// All items, ordered by expiration date.
    pub fn items(&self) -> Result<Vec<PantryItem>> {
        self.store.list_all()
    }

    /// Fetch one item.
    pub fn item(&self, id: i64) -> Result<Option<PantryItem>> {
        self.store.get(id)
    }

    /// Add a new item.
    ///
    /// The name is trimmed and must be non-empty. The item starts armed:
    /// whatever `notification_sent` the caller supplied is discarded. When
    /// the caller left the default icon, a classifier suggestion is applied
    /// if one is available.
    pub async fn add_item(&self, mut item: PantryItem) -> Result<PantryItem> {
        normalize(&mut item)?;
        item.notification_sent = false;

        if item.icon_name == DEFAULT_ICON_NAME {
            if let Some(icon) = self.suggest_icon(&item.name).await {
                item.icon_name = icon.name().to_owned();
            }
        }

        self.store.save(item)
    }

    /// Persist an edit to an existing item.
    ///
    /// The persisted record is re-read and the proposed edit routed through
    /// [`rearm_for_edit`], so a changed notification date re-arms the item
    /// and an unchanged one preserves the persisted sent flag — regardless
    /// of how stale the caller's copy is. If the record vanished
    /// concurrently, the edit re-inserts it armed. When the name changed
    /// and the caller didn't pick a different icon, a fresh suggestion is
    /// applied.
    pub async fn update_item(&self, mut proposed: PantryItem) -> Result<PantryItem> {
        normalize(&mut proposed)?;

        let previous = match proposed.id {
            Some(id) => self.store.get(id)?,
            None => None,
        };

        let mut merged = match &previous {
            Some(previous) => rearm_for_edit(previous, proposed),
            None => {
                // Unsaved, or deleted out from under the editor. Relative
                // to no persisted record every notification date is new,
                // so the item goes in armed.
                proposed.notification_sent = false;
                proposed
            }
        };

        let wants_suggestion = previous.as_ref().is_some_and(|previous| {
            previous.name != merged.name && previous.icon_name == merged.icon_name
        });
        if wants_suggestion {
            if let Some(icon) = self.suggest_icon(&merged.name).await {
                merged.icon_name = icon.name().to_owned();
            }
        }

        self.store.save(merged)
    }

    /// Flip the flagged marker on an item.
    ///
    /// Returns the updated item, or `None` if it no longer exists. Goes
    /// through [`Self::update_item`] like every other edit.
    pub async fn toggle_flagged(&self, id: i64) -> Result<Option<PantryItem>> {
        let Some(mut item) = self.store.get(id)? else {
            return Ok(None);
        };
        item.flagged = !item.flagged;
        self.update_item(item).await.map(Some)
    }

    /// Delete an item. Returns whether it existed.
    pub fn delete_item(&self, id: i64) -> Result<bool> {
        self.store.delete(id)
    }

    /// Ask the classifier for an icon suggestion.
    ///
    /// Best-effort: `None` when no classifier is attached, nothing
    /// matched, or the classifier failed internally.
    pub async fn suggest_icon(&self, name: &str) -> Option<FoodIcon> {
        let classifier = self.classifier.as_ref()?;
        let suggestion = classifier.suggest_icon(name).await;
        if suggestion.is_none() {
            debug!("no icon suggestion for '{name}'");
        }
        suggestion
    }
}

fn normalize(item: &mut PantryItem) -> Result<()> {
    item.name = item.name.trim().to_owned();
    item.notes = item.notes.trim().to_owned();
    if item.name.is_empty() {
        return Err(PantryError::Item("item name must not be empty".to_owned()));
    }
    Ok(())
}
