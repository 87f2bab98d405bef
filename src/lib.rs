//! pantryd: pantry expiration tracking and reminder dispatch engine.
//!
//! Tracks perishable items with optional one-time reminder dates, and
//! periodically dispatches due reminders with at-most-once semantics per
//! (item, date) pair.
//!
//! # Architecture
//!
//! - **Item record** ([`item`]): the data model plus the pure eligibility
//!   predicate and the edit re-arm chokepoint
//! - **Record store** ([`store`]): SQLite (production) and in-memory
//!   backends behind one trait, with a conditional mark-sent write
//! - **Dispatch** ([`notify`]): one bounded cycle of scan → deliver →
//!   conditionally mark sent, with per-item failure isolation
//! - **Trigger** ([`trigger`]): the periodic loop with a per-cycle budget
//!   and cooperative cancellation
//! - **Service** ([`service`]): item CRUD where every edit passes the
//!   re-arm chokepoint, with opportunistic icon classification

pub mod classify;
pub mod config;
pub mod error;
pub mod item;
pub mod notify;
pub mod service;
pub mod store;
pub mod trigger;

pub use classify::{FoodIcon, IconClassifier, KeywordClassifier};
pub use config::PantryConfig;
pub use error::{PantryError, Result};
pub use item::{PantryItem, rearm_for_edit};
pub use notify::{ChannelNotifier, CycleReport, NotificationDispatcher, Notifier, Reminder};
pub use service::Pantry;
pub use store::{ItemStore, MemoryItemStore, SqliteItemStore};
pub use trigger::CycleTrigger;
