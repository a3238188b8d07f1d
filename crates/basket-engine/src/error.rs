//! # Engine Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Runtime      │  │     Wrapped             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  ChannelClosed  │  │  Core (budget/checkout) │ │
//! │  │  ConfigLoad...  │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scan resolution never produces an `EngineError`; an unusable scan is
//! logged and dropped by the pipeline. Catalog store failures surface as
//! `Resolution::Unavailable` instead.

use thiserror::Error;

use basket_core::CoreError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid kiosk configuration.
    #[error("Invalid kiosk configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// The controller is gone (shut down or panicked).
    #[error("Channel error: {0}")]
    ChannelClosed(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Basket rule rejected the request (bad budget text, empty checkout).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl EngineError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_) | EngineError::ConfigLoadFailed(_)
        )
    }

    /// Returns true for errors the user caused and can correct at the kiosk.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EngineError::Core(CoreError::InvalidBudget(_)) | EngineError::Core(CoreError::EmptyCheckout)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(EngineError::InvalidConfig("bad".into()).is_config_error());
        assert!(EngineError::Core(CoreError::EmptyCheckout).is_user_error());
        assert!(!EngineError::ChannelClosed("gone".into()).is_user_error());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err = EngineError::from(CoreError::EmptyCheckout);
        assert_eq!(err.to_string(), CoreError::EmptyCheckout.to_string());
    }
}
