//! The notification dispatch cycle.
//!
//! One cycle reads the due set, delivers a reminder per item, and marks
//! each item sent with a conditional write. Items are processed
//! independently: a delivery or mark failure is accumulated into the
//! [`CycleReport`] and never aborts the cycle. The only fatal path is
//! failing to read the due set at the start.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::notifier::{Notifier, Reminder};
use crate::error::Result;
use crate::store::ItemStore;

/// Outcome of one dispatch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Items for which a reminder delivery was attempted.
    pub attempted: usize,
    /// Items delivered and marked sent.
    pub succeeded: usize,
    /// Items whose delivery or mark failed; retried next cycle.
    pub failed: usize,
    /// Items delivered but not marked because the record was deleted or
    /// re-armed between read and mark. Not failures: the item's new state
    /// governs future cycles.
    pub skipped_stale: usize,
    /// Ids of the failed items.
    pub failed_ids: Vec<i64>,
    /// True when the cycle stopped early on cancellation; counts above
    /// cover only the items processed before the stop.
    pub cancelled: bool,
}

/// Runs dispatch cycles against a store and a notifier.
pub struct NotificationDispatcher {
    store: Arc<dyn ItemStore>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over the given collaborators.
    pub fn new(store: Arc<dyn ItemStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Run one dispatch cycle as of `today`.
    ///
    /// The cancellation token is checked between items, never mid-item:
    /// on cancellation the partial report is returned and every
    /// unprocessed item stays armed for the next cycle. An error reading
    /// the due set is the only propagated failure.
    pub async fn run_cycle(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<CycleReport> {
        let due = self.store.list_notification_due(today)?;
        debug!("dispatch cycle: {} item(s) due as of {today}", due.len());

        let mut report = CycleReport::default();
        for item in due {
            if cancel.is_cancelled() {
                info!(
                    "dispatch cycle cancelled with {} item(s) processed",
                    report.attempted
                );
                report.cancelled = true;
                break;
            }

            // Rows from the store always carry an id and a date; skip
            // anything malformed rather than fail the cycle.
            let Some(reminder) = Reminder::for_item(&item) else {
                continue;
            };
            report.attempted += 1;

            if let Err(e) = self.notifier.deliver(&reminder).await {
                warn!("reminder delivery failed for item {}: {e}", reminder.item_id);
                report.failed += 1;
                report.failed_ids.push(reminder.item_id);
                continue;
            }

            match self
                .store
                .mark_notification_sent(reminder.item_id, reminder.notification_date)
            {
                Ok(true) => report.succeeded += 1,
                Ok(false) => {
                    debug!(
                        "item {} was deleted or re-armed mid-cycle, leaving unmarked",
                        reminder.item_id
                    );
                    report.skipped_stale += 1;
                }
                Err(e) => {
                    warn!("cannot mark item {} sent: {e}", reminder.item_id);
                    report.failed += 1;
                    report.failed_ids.push(reminder.item_id);
                }
            }
        }

        info!(
            "dispatch cycle done: {} attempted, {} succeeded, {} failed, {} stale",
            report.attempted, report.succeeded, report.failed, report.skipped_stale
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::error::PantryError;
    use crate::item::PantryItem;
    use crate::store::MemoryItemStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Records delivered reminders; fails delivery for listed item ids.
    #[derive(Default)]
    struct RecordingNotifier {
        delivered: Mutex<Vec<Reminder>>,
        fail_for: Vec<i64>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, reminder: &Reminder) -> Result<()> {
            if self.fail_for.contains(&reminder.item_id) {
                return Err(PantryError::Delivery("notifier offline".to_owned()));
            }
            self.delivered.lock().unwrap().push(reminder.clone());
            Ok(())
        }
    }

    /// Store whose due-set read always fails.
    struct BrokenStore;

    impl ItemStore for BrokenStore {
        fn list_all(&self) -> Result<Vec<PantryItem>> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
        fn get(&self, _id: i64) -> Result<Option<PantryItem>> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
        fn save(&self, _item: PantryItem) -> Result<PantryItem> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
        fn delete(&self, _id: i64) -> Result<bool> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
        fn list_notification_due(&self, _today: NaiveDate) -> Result<Vec<PantryItem>> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
        fn mark_notification_sent(&self, _id: i64, _expected: NaiveDate) -> Result<bool> {
            Err(PantryError::Storage("db locked".to_owned()))
        }
    }

    fn seed(store: &MemoryItemStore, name: &str, notification: NaiveDate) -> i64 {
        let mut item = PantryItem::new(name, date(2026, 3, 10));
        item.notification_date = Some(notification);
        store.save(item).expect("seed").id.unwrap()
    }

    #[tokio::test]
    async fn empty_store_yields_empty_report() {
        let store = Arc::new(MemoryItemStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::new(store, notifier.clone());

        let report = dispatcher
            .run_cycle(date(2026, 3, 1), &CancellationToken::new())
            .await
            .expect("cycle");

        assert_eq!(report, CycleReport::default());
        assert!(notifier.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delivers_and_marks_due_items() {
        let store = Arc::new(MemoryItemStore::new());
        let id = seed(&store, "Milk", date(2026, 3, 1));
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::new(store.clone(), notifier.clone());

        let report = dispatcher
            .run_cycle(date(2026, 3, 1), &CancellationToken::new())
            .await
            .expect("cycle");

        assert_eq!(report.attempted, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);

        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].body, "Milk needs your attention");

        let item = store.get(id).expect("get").expect("present");
        assert!(item.notification_sent);
    }

    #[tokio::test]
    async fn delivery_failure_is_isolated_per_item() {
        let store = Arc::new(MemoryItemStore::new());
        seed(&store, "a", date(2026, 2, 25));
        let failing_id = seed(&store, "b", date(2026, 2, 26));
        seed(&store, "c", date(2026, 2, 27));

        let notifier = Arc::new(RecordingNotifier {
            fail_for: vec![failing_id],
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(store.clone(), notifier);

        let report = dispatcher
            .run_cycle(date(2026, 3, 1), &CancellationToken::new())
            .await
            .expect("cycle");

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_ids, vec![failing_id]);

        // The failed item stays armed for the next cycle.
        let failed = store.get(failing_id).expect("get").expect("present");
        assert!(!failed.notification_sent);
    }

    #[tokio::test]
    async fn cancellation_before_first_item_reports_clean_stop() {
        let store = Arc::new(MemoryItemStore::new());
        seed(&store, "a", date(2026, 3, 1));
        let dispatcher =
            NotificationDispatcher::new(store, Arc::new(RecordingNotifier::default()));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = dispatcher
            .run_cycle(date(2026, 3, 1), &cancel)
            .await
            .expect("cycle");

        assert!(report.cancelled);
        assert_eq!(report.attempted, 0);
    }

    #[tokio::test]
    async fn unreadable_due_set_is_fatal() {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(BrokenStore),
            Arc::new(RecordingNotifier::default()),
        );

        let err = dispatcher
            .run_cycle(date(2026, 3, 1), &CancellationToken::new())
            .await
            .expect_err("fatal");
        assert!(matches!(err, PantryError::Storage(_)));
    }
}
