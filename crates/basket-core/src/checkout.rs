//! # Checkout Payload
//!
//! Renders the basket into the text handed to the external encoder
//! (typically a QR code shown on screen and scanned at the pay station).
//!
//! ## Payload Format
//! ```text
//! Smart Basket Checkout:
//! Apple (3x) @ 2.50 each
//! Bread (1x) @ 1.20 each
//! TOTAL: 8.70
//! ```
//!
//! Building a payload never touches the ledger. Clearing the basket after a
//! successful checkout is a separate, explicit action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::aggregate::AggregateView;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_product_name;
use crate::DEFAULT_CHECKOUT_HEADER;

/// A built checkout payload plus bookkeeping for logs and receipts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// Unique identifier for this checkout (UUID v4).
    pub checkout_id: String,

    /// When the payload was built.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Number of units in the basket.
    pub item_count: i64,

    /// Basket total in cents.
    pub total_cents: i64,

    /// The canonical payload text.
    pub text: String,
}

impl CheckoutPayload {
    /// Builds the payload for a view and total with the given header.
    pub fn build(header: &str, view: &AggregateView, total: Money) -> CoreResult<Self> {
        let text = build_payload_with_header(header, view, total)?;

        Ok(CheckoutPayload {
            checkout_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            item_count: view.total_quantity(),
            total_cents: total.cents(),
            text,
        })
    }

    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Renders the payload text with the default header.
pub fn build_payload(view: &AggregateView, total: Money) -> CoreResult<String> {
    build_payload_with_header(DEFAULT_CHECKOUT_HEADER, view, total)
}

/// Renders the payload text.
///
/// Lines follow the view's order (alphabetical by name):
/// `"{name} ({quantity}x) @ {unit price} each"`, then `"TOTAL: {total}"`.
///
/// ## Errors
/// - [`CoreError::EmptyCheckout`] when the view has no rows
/// - [`CoreError::Validation`] when the header or a product name would break
///   the line structure (embedded newlines or other control characters)
pub fn build_payload_with_header(
    header: &str,
    view: &AggregateView,
    total: Money,
) -> CoreResult<String> {
    if view.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }

    if header.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "checkout header".to_string(),
            reason: "control characters are not allowed".to_string(),
        }
        .into());
    }

    let mut lines = Vec::with_capacity(view.len() + 2);
    lines.push(header.to_string());

    for (name, entry) in view.rows() {
        validate_product_name(name)?;
        lines.push(format!(
            "{} ({}x) @ {} each",
            name,
            entry.quantity,
            entry.unit_price().to_decimal_string()
        ));
    }

    lines.push(format!("TOTAL: {}", total.to_decimal_string()));

    Ok(lines.join("\n"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateEntry;

    fn row(price: i64, qty: i64) -> AggregateEntry {
        AggregateEntry {
            unit_price_cents: price,
            quantity: qty,
            mixed_prices: false,
        }
    }

    fn apple_and_bread() -> AggregateView {
        vec![
            ("Bread".to_string(), row(120, 1)),
            ("Apple".to_string(), row(250, 3)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(&apple_and_bread(), Money::from_cents(870)).unwrap();
        let lines: Vec<&str> = payload.lines().collect();

        assert_eq!(lines.first(), Some(&DEFAULT_CHECKOUT_HEADER));
        assert!(lines.contains(&"Apple (3x) @ 2.50 each"));
        assert!(lines.contains(&"Bread (1x) @ 1.20 each"));
        assert_eq!(lines.last(), Some(&"TOTAL: 8.70"));
    }

    #[test]
    fn test_payload_lines_follow_display_order() {
        let payload =
            build_payload_with_header("Checkout", &apple_and_bread(), Money::from_cents(870))
                .unwrap();
        assert_eq!(
            payload,
            "Checkout\nApple (3x) @ 2.50 each\nBread (1x) @ 1.20 each\nTOTAL: 8.70"
        );
    }

    #[test]
    fn test_empty_basket_is_rejected() {
        let result = build_payload(&AggregateView::default(), Money::zero());
        assert!(matches!(result, Err(CoreError::EmptyCheckout)));

        let result = CheckoutPayload::build("x", &AggregateView::default(), Money::zero());
        assert!(matches!(result, Err(CoreError::EmptyCheckout)));
    }

    #[test]
    fn test_multiline_name_cannot_forge_a_total_line() {
        let view: AggregateView = vec![("Apple\nTOTAL: 0.00".to_string(), row(99_900, 1))]
            .into_iter()
            .collect();

        let result = build_payload(&view, Money::from_cents(99_900));
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_multiline_header_is_rejected() {
        let result =
            build_payload_with_header("Pay here\nTOTAL: 0.00", &apple_and_bread(), Money::zero());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_checkout_payload_bookkeeping() {
        let payload =
            CheckoutPayload::build("Checkout", &apple_and_bread(), Money::from_cents(870)).unwrap();

        assert_eq!(payload.item_count, 4);
        assert_eq!(payload.total(), Money::from_cents(870));
        assert!(Uuid::parse_str(&payload.checkout_id).is_ok());
        assert!(payload.text.ends_with("TOTAL: 8.70"));
    }
}
