//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CoreError        - Basket rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  basket-db errors (separate crate)                                     │
//! │  └── DbError          - Catalog database failures                      │
//! │                                                                         │
//! │  basket-engine errors (separate crate)                                 │
//! │  └── EngineError      - Channel / config failures, wraps the above     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → Kiosk notice        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: the kiosk turns each one into a single
//! user-facing notice and keeps running.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Basket rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested while the basket is empty.
    ///
    /// ## When This Occurs
    /// - Customer presses "Checkout" before scanning anything
    /// - Customer removed every item and then pressed "Checkout"
    ///
    /// No payload is produced.
    #[error("Basket is empty: add items before checking out")]
    EmptyCheckout,

    /// Budget text could not be parsed; the previous budget is kept.
    #[error("Invalid budget: {0}")]
    InvalidBudget(#[source] ValidationError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., "12.5.0" as an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::EmptyCheckout.to_string(),
            "Basket is empty: add items before checking out"
        );

        let err = ValidationError::Required {
            field: "tag".to_string(),
        };
        assert_eq!(err.to_string(), "tag is required");
    }

    #[test]
    fn test_invalid_budget_message_includes_reason() {
        let err = CoreError::InvalidBudget(ValidationError::InvalidFormat {
            field: "budget".to_string(),
            reason: "must be a number".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid budget: budget has invalid format: must be a number"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "tag".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
