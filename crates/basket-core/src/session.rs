//! # Basket Session
//!
//! The single owner of a customer's basket state.
//!
//! ## State and Recompute
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BasketSession                                      │
//! │                                                                         │
//! │   apply_scan ─┐                                                         │
//! │   set_budget ─┼──► mutate ledger / budget ──► recompute() ──► snapshot  │
//! │   reset ──────┘                                 │                       │
//! │                                                 ├── aggregate(ledger)   │
//! │                                                 ├── ledger.total()      │
//! │                                                 └── budget.classify()   │
//! │                                                                         │
//! │   checkout ──► payload from the current snapshot (no mutation)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregate, total and status are recomputed together in one step, so a
//! reader of [`BasketSession::snapshot`] never sees a half-applied toggle.
//! The session has no interior mutability; the engine keeps it on a single
//! task and serializes every call.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::{aggregate, AggregateView};
use crate::budget::{evaluate, Budget, BudgetStatus};
use crate::checkout::CheckoutPayload;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Ledger, LedgerChange};
use crate::money::Money;
use crate::types::{Product, Tag};
use crate::validation::parse_amount;
use crate::DEFAULT_CHECKOUT_HEADER;

// =============================================================================
// Snapshot
// =============================================================================

/// One aggregated row as shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BasketLine {
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub mixed_prices: bool,
}

/// Consistent post-recompute view of the basket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BasketSnapshot {
    /// Number of units in the ledger.
    pub entry_count: usize,

    /// Aggregated rows, alphabetical by name.
    pub items: Vec<BasketLine>,

    /// Basket total in cents.
    pub total_cents: i64,

    /// Budget in cents, if one is set.
    pub budget_cents: Option<i64>,

    /// Budget classification of the total.
    pub status: BudgetStatus,
}

impl BasketSnapshot {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Checks if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

// =============================================================================
// Updates
// =============================================================================

/// Raised when the status moves into [`BudgetStatus::Over`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAlert {
    pub total: Money,
    pub budget: Money,
}

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasketUpdate {
    /// Ledger change, for scan-driven updates.
    pub change: Option<LedgerChange>,

    /// Set only on the transition into OVER, not while staying over.
    pub alert: Option<BudgetAlert>,
}

// =============================================================================
// Session
// =============================================================================

/// Ledger, budget and the derived view for one kiosk session.
#[derive(Debug, Clone)]
pub struct BasketSession {
    ledger: Ledger,
    budget: Budget,
    view: AggregateView,
    snapshot: BasketSnapshot,
    checkout_header: String,
}

impl BasketSession {
    /// Creates an empty session with no budget.
    pub fn new() -> Self {
        Self::with_budget(Budget::unset())
    }

    /// Creates an empty session with an initial budget.
    pub fn with_budget(budget: Budget) -> Self {
        let mut session = BasketSession {
            ledger: Ledger::new(),
            budget,
            view: AggregateView::default(),
            snapshot: BasketSnapshot::default(),
            checkout_header: DEFAULT_CHECKOUT_HEADER.to_string(),
        };
        session.recompute();
        session
    }

    /// Sets the first line of checkout payloads.
    pub fn with_checkout_header(mut self, header: impl Into<String>) -> Self {
        self.checkout_header = header.into();
        self
    }

    /// Applies one resolved scan: toggles the tag and recomputes.
    pub fn apply_scan(&mut self, tag: Tag, product: Product) -> BasketUpdate {
        let change = self.ledger.toggle(tag, product);
        let alert = self.recompute();
        BasketUpdate {
            change: Some(change),
            alert,
        }
    }

    /// Replaces the budget and recomputes.
    pub fn set_budget(&mut self, budget: Budget) -> BasketUpdate {
        self.budget = budget;
        BasketUpdate {
            change: None,
            alert: self.recompute(),
        }
    }

    /// Parses keypad text into a budget.
    ///
    /// On failure the previous budget is kept and
    /// [`CoreError::InvalidBudget`] is returned.
    pub fn set_budget_from_input(&mut self, input: &str) -> CoreResult<BasketUpdate> {
        let amount = parse_amount("budget", input).map_err(CoreError::InvalidBudget)?;
        Ok(self.set_budget(Budget::from_money(amount)))
    }

    /// Builds the checkout payload for the current basket.
    ///
    /// The ledger is left untouched; call [`BasketSession::reset`] after the
    /// customer has paid.
    pub fn checkout(&self) -> CoreResult<CheckoutPayload> {
        if self.ledger.is_empty() {
            return Err(CoreError::EmptyCheckout);
        }
        CheckoutPayload::build(&self.checkout_header, &self.view, self.ledger.total())
    }

    /// Empties the basket, optionally clearing the budget too.
    pub fn reset(&mut self, clear_budget: bool) -> &BasketSnapshot {
        self.ledger.clear();
        if clear_budget {
            self.budget = Budget::unset();
        }
        self.recompute();
        &self.snapshot
    }

    /// The latest consistent snapshot.
    pub fn snapshot(&self) -> &BasketSnapshot {
        &self.snapshot
    }

    /// The latest aggregated view.
    pub fn view(&self) -> &AggregateView {
        &self.view
    }

    /// The ledger (read-only).
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The current budget.
    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Rebuilds view, total and status from the ledger in one step.
    fn recompute(&mut self) -> Option<BudgetAlert> {
        let previous = self.snapshot.status;
        let view = aggregate(&self.ledger);
        let evaluation = evaluate(&self.ledger, self.budget);

        let items = view
            .rows()
            .map(|(name, entry)| BasketLine {
                name: name.to_string(),
                unit_price_cents: entry.unit_price_cents,
                quantity: entry.quantity,
                mixed_prices: entry.mixed_prices,
            })
            .collect();

        self.snapshot = BasketSnapshot {
            entry_count: self.ledger.len(),
            items,
            total_cents: evaluation.total.cents(),
            budget_cents: self.budget.limit().map(|m| m.cents()),
            status: evaluation.status,
        };
        self.view = view;

        match (previous, evaluation.status, self.budget.limit()) {
            (prev, BudgetStatus::Over, Some(limit)) if prev != BudgetStatus::Over => {
                Some(BudgetAlert {
                    total: evaluation.total,
                    budget: limit,
                })
            }
            _ => None,
        }
    }
}

impl Default for BasketSession {
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
    fn test_scan_scenario() {
        let mut session = BasketSession::new();

        let update = session.apply_scan(tag("A1"), apple());
        assert_eq!(update.change, Some(LedgerChange::Added));
        assert_eq!(session.snapshot().total_cents, 250);

        session.apply_scan(tag("B1"), bread());
        assert_eq!(session.snapshot().total_cents, 370);

        let update = session.apply_scan(tag("A1"), apple());
        assert_eq!(update.change, Some(LedgerChange::Removed));
        assert_eq!(session.snapshot().total_cents, 120);

        let tags: Vec<&str> = session.ledger().tags().iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["B1"]);
        assert_eq!(session.snapshot().items.len(), 1);
        assert_eq!(session.snapshot().items[0].name, "Bread");
    }

    #[test]
    fn test_snapshot_is_consistent_with_ledger() {
        let mut session = BasketSession::new();
        session.apply_scan(tag("A1"), apple());
        session.apply_scan(tag("A2"), apple());
        session.apply_scan(tag("B1"), bread());

        let snapshot = session.snapshot();
        let quantity: i64 = snapshot.items.iter().map(|l| l.quantity).sum();
        assert_eq!(quantity, snapshot.entry_count as i64);
        assert_eq!(snapshot.total_cents, session.ledger().total().cents());
        assert_eq!(snapshot.items[0].name, "Apple");
        assert_eq!(snapshot.items[0].quantity, 2);
    }

    #[test]
    fn test_alert_only_on_transition_into_over() {
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(270)));

        // 2.50 is above 90% of 2.70 (2.43)
        let update = session.apply_scan(tag("A1"), apple());
        assert_eq!(session.snapshot().status, BudgetStatus::Warning);
        assert!(update.alert.is_none());

        let update = session.apply_scan(tag("B1"), bread());
        assert_eq!(session.snapshot().status, BudgetStatus::Over);
        assert_eq!(
            update.alert,
            Some(BudgetAlert {
                total: Money::from_cents(370),
                budget: Money::from_cents(270),
            })
        );

        // Still over: no second alert
        let update = session.apply_scan(tag("B2"), bread());
        assert!(update.alert.is_none());
        assert_eq!(session.snapshot().status, BudgetStatus::Over);
    }

    #[test]
    fn test_lowering_budget_below_total_alerts() {
        let mut session = BasketSession::new();
        session.apply_scan(tag("A1"), apple());

        let update = session.set_budget_from_input("2").unwrap();
        assert_eq!(session.snapshot().status, BudgetStatus::Over);
        assert!(update.alert.is_some());
    }

    #[test]
    fn test_invalid_budget_keeps_previous() {
        let mut session = BasketSession::new();
        session.set_budget_from_input("10").unwrap();

        let err = session.set_budget_from_input("ten").unwrap_err();
        assert!(matches!(err, CoreError::InvalidBudget(_)));
        assert_eq!(session.budget().limit(), Some(Money::from_cents(1000)));
        assert_eq!(session.snapshot().budget_cents, Some(1000));
    }

    #[test]
    fn test_zero_budget_unsets() {
        let mut session = BasketSession::new();
        session.set_budget_from_input("10").unwrap();
        session.set_budget_from_input("0").unwrap();

        assert!(!session.budget().is_set());
        assert_eq!(session.snapshot().status, BudgetStatus::None);
    }

    #[test]
    fn test_checkout_does_not_mutate() {
        let mut session = BasketSession::new().with_checkout_header("Sentinels Checkout:");
        session.apply_scan(tag("A1"), apple());
        session.apply_scan(tag("A2"), apple());
        session.apply_scan(tag("B1"), bread());

        let payload = session.checkout().unwrap();
        assert_eq!(
            payload.text,
            "Sentinels Checkout:\nApple (2x) @ 2.50 each\nBread (1x) @ 1.20 each\nTOTAL: 6.20"
        );
        assert_eq!(session.ledger().len(), 3);
    }

    #[test]
    fn test_checkout_empty_basket() {
        let mut session = BasketSession::new();
        assert!(matches!(session.checkout(), Err(CoreError::EmptyCheckout)));

        session.apply_scan(tag("A1"), apple());
        session.apply_scan(tag("A1"), apple());
        assert!(matches!(session.checkout(), Err(CoreError::EmptyCheckout)));
    }

    #[test]
    fn test_reset_keeps_budget_by_default() {
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(1000)));
        session.apply_scan(tag("A1"), apple());

        let snapshot = session.reset(false).clone();
        assert!(snapshot.is_empty());
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total_cents, 0);
        assert_eq!(snapshot.status, BudgetStatus::Safe);
        assert!(session.view().is_empty());
    }

    #[test]
    fn test_reset_with_budget_clear() {
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(1000)));
        session.apply_scan(tag("A1"), apple());

        let snapshot = session.reset(true);
        assert_eq!(snapshot.status, BudgetStatus::None);
        assert_eq!(snapshot.budget_cents, None);
    }

    #[test]
    fn test_over_alert_fires_again_after_reset() {
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(200)));
        assert!(session.apply_scan(tag("A1"), apple()).alert.is_some());

        session.reset(false);
        assert!(session.apply_scan(tag("A2"), apple()).alert.is_some());
    }

    #[test]
    fn test_oversized_prices_do_not_overflow_total() {
        let huge = Product::new("gold", "Gold", i64::MAX / 2 + 1);
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(100)));

        session.apply_scan(tag("G1"), huge.clone());
        let update = session.apply_scan(tag("G2"), huge);

        assert!(update.alert.is_none());
        assert_eq!(session.snapshot().total_cents, i64::MAX);
        assert_eq!(session.snapshot().status, BudgetStatus::Over);
    }
}
