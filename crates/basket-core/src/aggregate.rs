//! # Aggregation
//!
//! Groups ledger entries by product name for display and checkout.
//!
//! ```text
//! Ledger                               AggregateView
//! ──────                               ─────────────
//! A1 → Apple 2.50  ┐
//! A2 → Apple 2.50  ├─────────────────► Apple  { 2.50, qty 3 }
//! A3 → Apple 2.50  ┘
//! B1 → Bread 1.20  ──────────────────► Bread  { 1.20, qty 1 }
//! ```
//!
//! The view is a pure function of the ledger and is rebuilt after every
//! mutation. Iteration order is alphabetical by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::ledger::Ledger;
use crate::money::Money;

/// One displayed row: all units sharing a product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    /// Unit price of the earliest-inserted entry with this name.
    pub unit_price_cents: i64,

    /// Number of ledger entries with this name (always >= 1).
    pub quantity: i64,

    /// True when entries with this name carry different prices.
    pub mixed_prices: bool,
}

impl AggregateEntry {
    /// Returns the displayed unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// Product name → aggregated row, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateView {
    rows: BTreeMap<String, AggregateEntry>,
}

impl AggregateView {
    /// Rows in display order (alphabetical by name).
    pub fn rows(&self) -> impl Iterator<Item = (&str, &AggregateEntry)> {
        self.rows.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Looks up a row by product name.
    pub fn get(&self, name: &str) -> Option<&AggregateEntry> {
        self.rows.get(name)
    }

    /// Number of distinct product names.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Checks if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of quantities over all rows; equals the ledger's entry count.
    pub fn total_quantity(&self) -> i64 {
        self.rows.values().map(|e| e.quantity).sum()
    }

    /// Names whose entries disagree on price.
    pub fn mixed_price_names(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|(_, e)| e.mixed_prices)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl FromIterator<(String, AggregateEntry)> for AggregateView {
    fn from_iter<I: IntoIterator<Item = (String, AggregateEntry)>>(iter: I) -> Self {
        AggregateView {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Builds the per-name view of a ledger.
///
/// Grouping key is the product **name**, not the tag and not the price.
/// When prices for one name diverge, the earliest-inserted entry's price is
/// shown and the row is flagged with `mixed_prices`.
pub fn aggregate(ledger: &Ledger) -> AggregateView {
    let mut rows: BTreeMap<String, AggregateEntry> = BTreeMap::new();

    for entry in ledger.entries() {
        let product = &entry.product;
        match rows.get_mut(&product.name) {
            Some(row) => {
                row.quantity += entry.quantity();
                if row.unit_price_cents != product.price_cents {
                    row.mixed_prices = true;
                }
            }
            None => {
                rows.insert(
                    product.name.clone(),
                    AggregateEntry {
                        unit_price_cents: product.price_cents,
                        quantity: entry.quantity(),
                        mixed_prices: false,
                    },
                );
            }
        }
    }

    AggregateView { rows }
}

// =============================================================================
// Unit Tests
// =============================================================================
