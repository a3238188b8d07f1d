//! # Total & Budget Evaluation
//!
//! Classifies the basket total against the customer's budget.
//!
//! ## Thresholds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  budget unset (0)            → NONE                                    │
//! │                                                                         │
//! │  0 ─────────────── 0.9 × B ──────────── B ─────────────►  total       │
//! │        SAFE           │      WARNING    │      OVER                    │
//! │   (total ≤ 0.9B)      │  (0.9B < t ≤ B) │   (total > B)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The 90% comparison is done on integers (`total × 10000 > B × 9000`), so a
//! total of exactly 90% of the budget is still SAFE.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ledger::Ledger;
use crate::money::Money;
use crate::WARNING_THRESHOLD_BPS;

// =============================================================================
// Budget
// =============================================================================

/// The customer's spending ceiling. Zero means "no budget".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Budget(Option<Money>);

impl Budget {
    /// No constraint.
    #[inline]
    pub const fn unset() -> Self {
        Budget(None)
    }

    /// Creates a budget; zero or negative amounts mean "unset".
    pub fn from_money(limit: Money) -> Self {
        if limit.is_positive() {
            Budget(Some(limit))
        } else {
            Budget(None)
        }
    }

    /// Returns the ceiling, if one is set.
    #[inline]
    pub fn limit(&self) -> Option<Money> {
        self.0
    }

    /// Checks whether a ceiling is set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Classifies a total against this budget.
    pub fn classify(&self, total: Money) -> BudgetStatus {
        let Some(limit) = self.0 else {
            return BudgetStatus::None;
        };

        if total > limit {
            return BudgetStatus::Over;
        }

        let scaled_total = total.cents() as i128 * 10_000;
        let scaled_threshold = limit.cents() as i128 * WARNING_THRESHOLD_BPS as i128;
        if scaled_total > scaled_threshold {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Safe
        }
    }
}

// =============================================================================
// Budget Status
// =============================================================================

/// Where the total sits relative to the budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// No budget is set.
    #[default]
    None,
    /// Total is at most 90% of the budget.
    Safe,
    /// Total is above 90% of the budget but not above the budget.
    Warning,
    /// Total is above the budget.
    Over,
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::None => write!(f, "none"),
            BudgetStatus::Safe => write!(f, "safe"),
            BudgetStatus::Warning => write!(f, "warning"),
            BudgetStatus::Over => write!(f, "over"),
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Total and classification computed together from one ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub total: Money,
    pub status: BudgetStatus,
}

/// Recomputes the total by full summation and classifies it.
///
/// Never adjusts a running total: every call starts from the ledger.
pub fn evaluate(ledger: &Ledger, budget: Budget) -> Evaluation {
    let total = ledger.total();
    Evaluation {
        total,
        status: budget.classify(total),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, Tag};

    fn budget(cents: i64) -> Budget {
        Budget::from_money(Money::from_cents(cents))
    }

    #[test]
    fn test_unset_budget_is_none() {
        assert_eq!(Budget::unset().classify(Money::from_cents(99_999)), BudgetStatus::None);
        assert_eq!(budget(0).classify(Money::from_cents(10)), BudgetStatus::None);
        assert!(!budget(0).is_set());
        assert!(!budget(-100).is_set());
    }

    #[test]
    fn test_classification_boundaries() {
        let b = budget(1000);

        assert_eq!(b.classify(Money::zero()), BudgetStatus::Safe);
        assert_eq!(b.classify(Money::from_cents(900)), BudgetStatus::Safe);
        assert_eq!(b.classify(Money::from_cents(901)), BudgetStatus::Warning);
        assert_eq!(b.classify(Money::from_cents(1000)), BudgetStatus::Warning);
        assert_eq!(b.classify(Money::from_cents(1001)), BudgetStatus::Over);
    }

    #[test]
    fn test_threshold_is_exact_for_odd_budgets() {
        // 90% of 10.01 is 9.009: 9.00 is safe, 9.01 is warning
        let b = budget(1001);
        assert_eq!(b.classify(Money::from_cents(900)), BudgetStatus::Safe);
        assert_eq!(b.classify(Money::from_cents(901)), BudgetStatus::Warning);
    }

    #[test]
    fn test_evaluate_sums_ledger() {
        let mut ledger = Ledger::new();
        ledger.toggle(Tag::parse("A1").unwrap(), Product::new("apple", "Apple", 250));
        ledger.toggle(Tag::parse("B1").unwrap(), Product::new("bread", "Bread", 120));

        let eval = evaluate(&ledger, budget(400));
        assert_eq!(eval.total.cents(), 370);
        assert_eq!(eval.status, BudgetStatus::Warning);

        let eval = evaluate(&ledger, budget(300));
        assert_eq!(eval.status, BudgetStatus::Over);

        let eval = evaluate(&ledger, Budget::unset());
        assert_eq!(eval.status, BudgetStatus::None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&BudgetStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    use proptest::prelude::*;

    fn rank(status: BudgetStatus) -> u8 {
        match status {
            BudgetStatus::None => 0,
            BudgetStatus::Safe => 1,
            BudgetStatus::Warning => 2,
            BudgetStatus::Over => 3,
        }
    }

    proptest! {
        #[test]
        fn classification_matches_integer_rule(t in 0i64..=i64::MAX, b in 1i64..=i64::MAX) {
            let expected = if t > b {
                BudgetStatus::Over
            } else if 10_000 * t as i128 > 9_000 * b as i128 {
                BudgetStatus::Warning
            } else {
                BudgetStatus::Safe
            };
            prop_assert_eq!(budget(b).classify(Money::from_cents(t)), expected);
        }

        #[test]
        fn status_is_monotonic_in_total(
            t1 in 0i64..10_000_000,
            t2 in 0i64..10_000_000,
            b in 1i64..10_000_000,
        ) {
            let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let b = budget(b);
            prop_assert!(
                rank(b.classify(Money::from_cents(low))) <= rank(b.classify(Money::from_cents(high)))
            );
        }

        #[test]
        fn unset_budget_is_always_none(t in 0i64..=i64::MAX, b in i64::MIN..=0) {
            prop_assert_eq!(budget(b).classify(Money::from_cents(t)), BudgetStatus::None);
        }
    }
}
