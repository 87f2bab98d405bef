//! Reminder construction, delivery, and the dispatch cycle.

pub mod dispatch;
pub mod notifier;

pub use dispatch::{CycleReport, NotificationDispatcher};
pub use notifier::{ChannelNotifier, Notifier, Reminder};
