//! Reminder payloads and the delivery capability.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{PantryError, Result};
use crate::item::PantryItem;

/// A user-facing reminder for one pantry item.
///
/// Construction is deterministic: the same item state always yields the
/// same payload, and `dedupe_key` identifies the (item, date) pair so a
/// retried delivery cannot surface twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Store id of the item this reminder is for.
    pub item_id: i64,
    /// Idempotency key: item id scoped to the reminder's date.
    pub dedupe_key: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// The `notification_date` this reminder was generated for. The
    /// dispatch cycle marks the item sent only while this still matches
    /// the stored value.
    pub notification_date: NaiveDate,
}

impl Reminder {
    /// Build the reminder for an item, or `None` if the item is unsaved or
    /// has no notification date.
    pub fn for_item(item: &PantryItem) -> Option<Self> {
        let id = item.id?;
        let date = item.notification_date?;
        Some(Self {
            item_id: id,
            dedupe_key: format!("pantry-{id}-{date}"),
            title: "Pantry Reminder".to_owned(),
            body: format!("{} needs your attention", item.name),
            notification_date: date,
        })
    }
}

/// Capability for delivering reminders to the user.
///
/// Fire-and-forget beyond the result: the dispatch cycle only cares whether
/// delivery was accepted.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, reminder: &Reminder) -> Result<()>;
}

/// Delivers reminders over an unbounded channel.
///
/// The receiving side is whatever presents notifications to the user — the
/// binary drains it to the log; a GUI would forward to the OS notification
/// center. A closed channel is reported as a delivery failure.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Reminder>,
}

impl ChannelNotifier {
    /// Create a notifier sending into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Reminder>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, reminder: &Reminder) -> Result<()> {
        self.tx
            .send(reminder.clone())
            .map_err(|_| PantryError::Delivery("reminder channel closed".to_owned()))
    }
}
