//! The pantry item record and its notification-state rules.
//!
//! Two pieces of pure logic live here alongside the data model:
//! [`PantryItem::is_notification_due`], the eligibility predicate the
//! dispatch cycle filters on, and [`rearm_for_edit`], the single chokepoint
//! every edit path must route through before persisting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Icon used when nothing better is known about an item.
pub const DEFAULT_ICON_NAME: &str = "utensils";

fn default_icon_name() -> String {
    DEFAULT_ICON_NAME.to_owned()
}

/// A perishable item tracked by the pantry.
///
/// `id` is `None` until the store assigns one on first save. Reminder state
/// is the pair (`notification_date`, `notification_sent`): the flag is only
/// meaningful relative to the *current* date value, and must be reset
/// whenever that value changes (see [`rearm_for_edit`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    /// Store-assigned row id, `None` before first save.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Calendar date the item is expected to spoil.
    pub expiration_date: NaiveDate,
    /// User attention marker.
    #[serde(default)]
    pub flagged: bool,
    /// Date a one-time reminder should fire, if any.
    #[serde(default)]
    pub notification_date: Option<NaiveDate>,
    /// True once a reminder went out for the current `notification_date`.
    #[serde(default)]
    pub notification_sent: bool,
    /// Whether the item lives in the fridge.
    #[serde(default)]
    pub refrigerated: bool,
    /// Food icon name from the [`crate::classify::FoodIcon`] catalog.
    #[serde(default = "default_icon_name")]
    pub icon_name: String,
}

impl PantryItem {
    /// Create an unsaved item with the given name and expiration date.
    pub fn new(name: impl Into<String>, expiration_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            notes: String::new(),
            expiration_date,
            flagged: false,
            notification_date: None,
            notification_sent: false,
            refrigerated: false,
            icon_name: default_icon_name(),
        }
    }

    /// Returns `true` if a reminder is due for this item as of `today`.
    ///
    /// Pure and total: a reminder is due iff a `notification_date` is set,
    /// no reminder has gone out for it yet, and the date is not in the
    /// future. `today` is injected so callers (and tests) control the clock.
    /// For a fixed record this is monotonic in time — once due it stays due
    /// until the dispatch cycle marks it sent or an edit moves the date.
    pub fn is_notification_due(&self, today: NaiveDate) -> bool {
        match self.notification_date {
            Some(date) => !self.notification_sent && date <= today,
            None => false,
        }
    }
}

/// Reconcile a proposed edit against the persisted record before saving.
///
/// If the edit moved `notification_date` (clearing or setting it counts as
/// moving; both-absent compares equal), the returned item is re-armed:
/// `notification_sent` is forced to `false` so a fresh reminder fires for
/// the new date. If the date is unchanged, the *persisted* flag is carried
/// forward — whatever flag the proposed copy held is discarded, so a caller
/// working from a stale snapshot can neither re-arm nor un-arm an item by
/// accident.
///
/// `previous` must be the record as currently persisted, freshly read. All
/// mutation paths (add, edit, bulk toggles) go through this one function.
pub fn rearm_for_edit(previous: &PantryItem, mut proposed: PantryItem) -> PantryItem {
    if proposed.notification_date != previous.notification_date {
        proposed.notification_sent = false;
    } else {
        proposed.notification_sent = previous.notification_sent;
    }
    proposed
}
