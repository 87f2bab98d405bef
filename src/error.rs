//! Error types for the pantryd engine.

/// Top-level error type for the pantry reminder system.
#[derive(Debug, thiserror::Error)]
pub enum PantryError {
    /// Item store read/write error (database unavailable, bad row).
    #[error("storage error: {0}")]
    Storage(String),

    /// Reminder delivery error (notification channel closed or rejected).
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Icon classification error.
    #[error("classification error: {0}")]
    Classification(String),

    /// Invalid item data (empty name, unsaved id where one is required).
    #[error("item error: {0}")]
    Item(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PantryError>;
