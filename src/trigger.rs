//! Periodic dispatch trigger.
//!
//! Spawns a tokio task that runs a dispatch cycle on a fixed interval,
//! giving each cycle a bounded execution budget. This is the only place
//! that reads the wall clock — everything below it takes `today` as a
//! parameter. Skipped or late wake-ups are safe: unsent reminders stay
//! armed and are picked up by the next cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::notify::{CycleReport, NotificationDispatcher};

/// Default interval between dispatch cycles (2 hours).
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 2 * 3600;

/// Default per-cycle execution budget (seconds).
pub const DEFAULT_CYCLE_BUDGET_SECS: u64 = 25;

/// Periodically fires dispatch cycles until cancelled.
pub struct CycleTrigger {
    dispatcher: Arc<NotificationDispatcher>,
    tick_interval: Duration,
    cycle_budget: Duration,
    cancel: CancellationToken,
    report_tx: mpsc::UnboundedSender<CycleReport>,
}

impl CycleTrigger {
    /// Create a trigger with the default interval and budget.
    ///
    /// Cycle reports are forwarded to `report_tx`; cancelling `cancel`
    /// stops the loop between cycles.
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        cancel: CancellationToken,
        report_tx: mpsc::UnboundedSender<CycleReport>,
    ) -> Self {
        Self {
            dispatcher,
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
            cycle_budget: Duration::from_secs(DEFAULT_CYCLE_BUDGET_SECS),
            cancel,
            report_tx,
        }
    }

    /// Override the interval between cycles.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Override the per-cycle execution budget.
    pub fn with_cycle_budget(mut self, budget: Duration) -> Self {
        self.cycle_budget = budget;
        self
    }

    /// Start the trigger loop. The first cycle runs immediately.
    pub fn run(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "cycle trigger started, ticking every {}s with a {}s budget",
                self.tick_interval.as_secs(),
                self.cycle_budget.as_secs()
            );
            let mut interval = tokio::time::interval(self.tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        info!("cycle trigger stopped");
                        return;
                    }
                    _ = interval.tick() => {}
                }
                if !self.fire_once().await {
                    return;
                }
            }
        })
    }

    /// Run one budgeted cycle. Returns `false` when the report channel is
    /// gone and the loop should stop.
    async fn fire_once(&self) -> bool {
        let today = Local::now().date_naive();

        // Budget enforcement is cooperative: a watchdog cancels the cycle's
        // child token when the budget elapses, and the dispatcher observes
        // it between items.
        let cycle_cancel = self.cancel.child_token();
        let watchdog = {
            let cancel = cycle_cancel.clone();
            let budget = self.cycle_budget;
            tokio::spawn(async move {
                tokio::time::sleep(budget).await;
                debug!("cycle budget elapsed, cancelling");
                cancel.cancel();
            })
        };

        let result = self.dispatcher.run_cycle(today, &cycle_cancel).await;
        watchdog.abort();

        match result {
            Ok(report) => {
                if self.report_tx.send(report).is_err() {
                    debug!("cycle report channel closed, stopping trigger");
                    return false;
                }
            }
            // Storage was unavailable for this cycle; the next tick retries.
            Err(e) => error!("dispatch cycle failed: {e}"),
        }
        true
    }
}
