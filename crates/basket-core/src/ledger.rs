//! # Basket Ledger
//!
//! The authoritative record of which physical units are in the basket.
//!
//! ## Toggle Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Toggle                                        │
//! │                                                                         │
//! │  scan(A1, Apple) ──► A1 absent?  ──► insert { Apple, qty 1 }  ADDED     │
//! │                                                                         │
//! │  scan(A1, Apple) ──► A1 present? ──► delete entry             REMOVED   │
//! │                                                                         │
//! │  scan(A2, Apple) ──► different unit, separate entry           ADDED     │
//! │                                                                         │
//! │  A tag is a unit, not a counter: repeated scans oscillate,              │
//! │  they never stack a quantity above 1.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are kept in insertion order. Aggregation relies on this to pick
//! the displayed unit price deterministically (earliest entry wins).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Tag};

/// Result of applying a toggle to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerChange {
    /// The tag was absent and is now in the basket.
    Added,
    /// The tag was present and has left the basket.
    Removed,
}

/// One physical unit currently in the basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The unit's tag.
    pub tag: Tag,

    /// Product data resolved when the unit was scanned in (frozen).
    pub product: Product,

    /// When this unit was scanned in.
    pub added_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Every entry is exactly one unit.
    pub const QUANTITY: i64 = 1;

    /// Returns the entry's quantity, which is always [`LedgerEntry::QUANTITY`].
    #[inline]
    pub const fn quantity(&self) -> i64 {
        Self::QUANTITY
    }

    /// Returns the line amount (unit price × 1).
    #[inline]
    pub fn amount(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity())
    }
}

/// Mapping from tag to the unit it identifies.
///
/// ## Invariants
/// - At most one entry per tag
/// - An entry exists if and only if that unit is in the basket
/// - Removing an absent tag cannot happen through `toggle` (it adds instead)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,

    /// When the ledger was created or last cleared.
    created_at: DateTime<Utc>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds the unit if its tag is absent, removes it if present.
    ///
    /// Callers must only pass resolved products; an unresolved scan never
    /// reaches the ledger.
    pub fn toggle(&mut self, tag: Tag, product: Product) -> LedgerChange {
        if let Some(index) = self.position(&tag) {
            self.entries.remove(index);
            return LedgerChange::Removed;
        }

        self.entries.push(LedgerEntry {
            tag,
            product,
            added_at: Utc::now(),
        });
        LedgerChange::Added
    }

    /// Empties the ledger unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.created_at = Utc::now();
    }

    /// Checks whether a tag is currently in the basket.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.position(tag).is_some()
    }

    /// Returns the entry for a tag, if present.
    pub fn get(&self, tag: &Tag) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| &e.tag == tag)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> Vec<&Tag> {
        self.entries.iter().map(|e| &e.tag).collect()
    }

    /// Number of units in the basket.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry's amount, recomputed from scratch on each call.
    pub fn total(&self) -> Money {
        self.entries.iter().map(LedgerEntry::amount).sum()
    }

    /// When the ledger was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn position(&self, tag: &Tag) -> Option<usize> {
        self.entries.iter().position(|e| &e.tag == tag)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> Tag {
        Tag::parse(s).unwrap()
    }

    fn apple() -> Product {
        Product::new("apple", "Apple", 250)
    }

    fn bread() -> Product {
        Product::new("bread", "Bread", 120)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut ledger = Ledger::new();

        assert_eq!(ledger.toggle(tag("A1"), apple()), LedgerChange::Added);
        assert!(ledger.contains(&tag("A1")));
        assert_eq!(ledger.len(), 1);

        assert_eq!(ledger.toggle(tag("A1"), apple()), LedgerChange::Removed);
        assert!(!ledger.contains(&tag("A1")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_prior_state() {
        let mut ledger = Ledger::new();
        ledger.toggle(tag("B1"), bread());
        ledger.toggle(tag("A2"), apple());
        let before: Vec<String> = ledger.tags().iter().map(|t| t.to_string()).collect();
        let total_before = ledger.total();

        ledger.toggle(tag("A1"), apple());
        ledger.toggle(tag("A1"), apple());

        let after: Vec<String> = ledger.tags().iter().map(|t| t.to_string()).collect();
        assert_eq!(before, after);
        assert_eq!(ledger.total(), total_before);
    }

    #[test]
    fn test_repeated_scans_never_stack_quantity() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.toggle(tag("A1"), apple());
        }

        // Odd number of scans: present, exactly one unit
        assert_eq!(ledger.len(), 1);
        let entry = ledger.get(&tag("A1")).unwrap();
        assert_eq!(entry.quantity(), 1);
        assert_eq!(ledger.total().cents(), 250);
    }

    #[test]
    fn test_distinct_tags_same_product_are_separate_units() {
        let mut ledger = Ledger::new();
        ledger.toggle(tag("A1"), apple());
        ledger.toggle(tag("A2"), apple());
        ledger.toggle(tag("A3"), apple());

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total().cents(), 750);
    }

    #[test]
    fn test_total_matches_sum_of_entries() {
        let mut ledger = Ledger::new();
        ledger.toggle(tag("A1"), apple());
        ledger.toggle(tag("B1"), bread());
        ledger.toggle(tag("A2"), apple());
        ledger.toggle(tag("A1"), apple());

        let expected: i64 = ledger.entries().iter().map(|e| e.product.price_cents).sum();
        assert_eq!(ledger.total().cents(), expected);
        assert_eq!(ledger.total().cents(), 370);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut ledger = Ledger::new();
        ledger.toggle(tag("A1"), apple());
        ledger.toggle(tag("B1"), bread());

        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut ledger = Ledger::new();
        ledger.toggle(tag("B1"), bread());
        ledger.toggle(tag("A1"), apple());
        ledger.toggle(tag("C1"), apple());
        ledger.toggle(tag("A1"), apple());

        let tags: Vec<&str> = ledger.tags().iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["B1", "C1"]);
    }

    // =========================================================================
    // Properties over arbitrary scan sequences
    // =========================================================================

    use proptest::prelude::*;
    use std::collections::BTreeMap;

    const CATALOG: [(&str, &str, i64); 4] = [
        ("apple", "Apple", 250),
        ("bread", "Bread", 120),
        ("milk", "Milk", 95),
        ("free", "Sample", 0),
    ];

    fn product(index: usize) -> Product {
        let (id, name, price) = CATALOG[index];
        Product::new(id, name, price)
    }

    /// (tag number, catalog index) pairs.
    fn arb_scans() -> impl Strategy<Value = Vec<(u8, usize)>> {
        prop::collection::vec((0u8..8, 0..CATALOG.len()), 0..40)
    }

    fn replay(scans: &[(u8, usize)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (n, p) in scans {
            ledger.toggle(tag(&format!("T{}", n)), product(*p));
        }
        ledger
    }

    proptest! {
        #[test]
        fn ledger_matches_set_model(scans in arb_scans()) {
            let ledger = replay(&scans);

            let mut model: BTreeMap<String, i64> = BTreeMap::new();
            for (n, p) in &scans {
                let key = format!("T{}", n);
                if model.remove(&key).is_none() {
                    model.insert(key, CATALOG[*p].2);
                }
            }

            prop_assert_eq!(ledger.len(), model.len());
            for key in model.keys() {
                prop_assert!(ledger.contains(&tag(key)));
            }
            prop_assert_eq!(ledger.total().cents(), model.values().sum::<i64>());
        }

        #[test]
        fn total_is_sum_of_unit_prices(scans in arb_scans()) {
            let ledger = replay(&scans);
            let expected: i64 = ledger.entries().iter().map(|e| e.product.price_cents).sum();

            prop_assert_eq!(ledger.total().cents(), expected);
            prop_assert!(!ledger.total().is_negative());
            prop_assert!(ledger.entries().iter().all(|e| e.quantity() == 1));
        }

        #[test]
        fn double_toggle_is_identity(scans in arb_scans(), n in 0u8..8, p in 0..CATALOG.len()) {
            let mut ledger = replay(&scans);
            let tags_before: Vec<String> = ledger.tags().iter().map(|t| t.to_string()).collect();
            let total_before = ledger.total();

            let first = ledger.toggle(tag(&format!("T{}", n)), product(p));
            let second = ledger.toggle(tag(&format!("T{}", n)), product(p));
            prop_assert_ne!(first, second);

            let tags_after: Vec<String> = ledger.tags().iter().map(|t| t.to_string()).collect();
            prop_assert_eq!(ledger.total(), total_before);
            prop_assert_eq!(
                tags_before.iter().collect::<std::collections::BTreeSet<_>>(),
                tags_after.iter().collect::<std::collections::BTreeSet<_>>()
            );
        }
    }
}
