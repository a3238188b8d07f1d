//! # Validation Module
//!
//! Input validation for the kiosk.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Scanner / keypad                                             │
//! │  └── Keypad only offers digits and one decimal point                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Tags: non-empty, bounded length                                   │
//! │  ├── Names: single line, no control characters                         │
//! │  ├── Prices: 0 ..= MAX_PRICE_CENTS                                     │
//! │  └── Budget text: exact decimal parse, no floats                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog database (SQLite CHECK constraints)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::{parse_amount, validate_tag};
//!
//! validate_tag("RT101_U12345").unwrap();
//! assert_eq!(parse_amount("budget", "12.5").unwrap().cents(), 1250);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_PRICE_CENTS, MAX_TAG_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name the catalog accepts.
const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a scanned tag.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most [`MAX_TAG_LEN`] characters
pub fn validate_tag(tag: &str) -> ValidationResult<()> {
    let tag = tag.trim();

    if tag.is_empty() {
        return Err(ValidationError::Required {
            field: "tag".to_string(),
        });
    }

    if tag.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::TooLong {
            field: "tag".to_string(),
            max: MAX_TAG_LEN,
        });
    }

    Ok(())
}

/// Validates a product name before it enters the catalog.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    // Names become payload lines
    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "name".to_string(),
            reason: "control characters are not allowed".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items); the ceiling is
/// [`MAX_PRICE_CENTS`].
///
/// ## Example
/// ```rust
/// use basket_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(250).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Parses a non-negative decimal amount into Money without going through
/// floating point.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Digits with at most one `.`; at least one digit overall
/// - At most two fractional digits (`12.345` is rejected, not rounded)
/// - No sign, no exponent, no thousands separators
///
/// ## User Workflow
/// ```text
/// Keypad entry "50.5"
///      │
///      ▼
/// parse_amount("budget", "50.5") ← THIS FUNCTION
///      │
///      ├── "abc" / "1.2.3" / "" → InvalidFormat / Required
///      │
///      └── OK → Money(5050)
/// ```
pub fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("must contain at least one digit"));
    }

    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("must be a number like 50 or 50.25"));
    }

    if frac.len() > 2 {
        return Err(invalid("must have at most two decimal places"));
    }

    let major: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX / 100,
        })?
    };

    let minor: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().unwrap_or(0) * 10,
        _ => frac.parse::<i64>().unwrap_or(0),
    };

    let cents = major
        .checked_mul(100)
        .and_then(|c| c.checked_add(minor))
        .ok_or_else(|| ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX / 100,
        })?;

    Ok(Money::from_cents(cents))
}

// =============================================================================
// Unit Tests
// =============================================================================
