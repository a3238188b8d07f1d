//! # Kiosk Error Type
//!
//! ```text
//! EngineError ─┐
//! DbError ─────┼──► KioskError ──► main() prints it and exits non-zero
//! io::Error ───┘
//! ```
//!
//! Only startup and I/O failures end up here. Budget and checkout mistakes
//! are shown to the customer as notices and the kiosk keeps running.

use thiserror::Error;

use basket_db::DbError;
use basket_engine::EngineError;

/// Result type for the kiosk application.
pub type KioskResult<T> = Result<T, KioskError>;

/// Kiosk application errors.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Bad command-line usage.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The catalog database could not be opened at startup.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[source] DbError),

    /// Engine failure (config, channels).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Catalog query failure after startup.
    #[error(transparent)]
    Database(#[from] DbError),

    /// A background task panicked or was cancelled.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Console or filesystem I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be rendered as JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for KioskError {
    fn from(err: tokio::task::JoinError) -> Self {
        KioskError::TaskFailed(err.to_string())
    }
}
