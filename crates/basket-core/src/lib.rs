//! # basket-core: Pure Basket Logic for the Smart Basket Kiosk
//!
//! This crate is the **heart** of the kiosk. It turns a stream of tag scans
//! into a basket: a per-instance ledger, a per-product aggregate view, a total
//! and a budget classification, plus the checkout payload.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Smart Basket Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Kiosk (console / front end)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ BasketHandle / BasketObserver          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        basket-engine (scan pipeline + controller loop)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌──────────┐ ┌──────────────┐     │   │
//! │  │   │  ledger  │ │ aggregate │ │  budget  │ │   checkout   │     │   │
//! │  │   │  toggle  │ │  by name  │ │  status  │ │   payload    │     │   │
//! │  │   └──────────┘ └───────────┘ └──────────┘ └──────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CHANNELS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Tag, Product)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Per-instance basket ledger with toggle semantics
//! - [`aggregate`] - Per-product view derived from the ledger
//! - [`budget`] - Total and budget classification
//! - [`checkout`] - Checkout payload text
//! - [`session`] - `BasketSession`, the owner of all basket state
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (tags, budget text, catalog data)
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{BasketSession, Product, Tag};
//!
//! let mut session = BasketSession::new();
//! let apple = Product::new("apple", "Apple", 250);
//!
//! session.apply_scan(Tag::parse("A1").unwrap(), apple.clone());
//! assert_eq!(session.snapshot().total_cents, 250);
//!
//! // The same tag scanned again leaves the basket
//! session.apply_scan(Tag::parse("A1").unwrap(), apple);
//! assert_eq!(session.snapshot().total_cents, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod budget;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, AggregateEntry, AggregateView};
pub use budget::{evaluate, Budget, BudgetStatus, Evaluation};
pub use checkout::{build_payload, build_payload_with_header, CheckoutPayload};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, LedgerChange, LedgerEntry};
pub use money::Money;
pub use session::{BasketLine, BasketSession, BasketSnapshot, BasketUpdate, BudgetAlert};
pub use types::{Product, Tag};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a scanned tag.
///
/// RFID/QR tags on shelf items are short; anything longer is a misread.
pub const MAX_TAG_LEN: usize = 128;

/// Highest unit price the catalog accepts, in cents (1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Warning threshold as a fraction of the budget, in basis points (90%).
pub const WARNING_THRESHOLD_BPS: i64 = 9000;

/// Header line of the checkout payload when none is configured.
pub const DEFAULT_CHECKOUT_HEADER: &str = "Smart Basket Checkout:";
