//! # Domain Types
//!
//! Core domain types used throughout the kiosk.
//!
//! ## Identity Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tag "RT101_U12345"          one physical unit on the shelf             │
//! │        │                                                                │
//! │        │ scanned together with its catalog identifier                   │
//! │        ▼                                                                │
//! │  Product { id: "RT101", name: "Apple", price_cents: 250 }               │
//! │                                                                         │
//! │  Two apples carry two different tags but resolve to the same Product.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_tag, ValidationResult};

// =============================================================================
// Tag
// =============================================================================

/// Opaque identifier of one physical item instance.
///
/// Tags are never reused across distinct units within a session, which is
/// what lets a second scan of the same tag mean "this unit left the basket".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tag(String);

impl Tag {
    /// Parses a raw scanned tag, trimming surrounding whitespace.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::Tag;
    ///
    /// assert_eq!(Tag::parse("  A1 ").unwrap().as_str(), "A1");
    /// assert!(Tag::parse("   ").is_err());
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        validate_tag(trimmed)?;
        Ok(Tag(trimmed.to_string()))
    }

    /// Returns the tag text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Resolved catalog data for a scanned identifier.
///
/// Immutable once resolved. Prices are assumed stable for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Catalog identifier (what the scanner reads next to the tag).
    pub id: String,

    /// Display name; also the aggregation key.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Creates a product from its parts.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price_cents,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
