//! # Console Observer
//!
//! Renders basket events to stdout.
//!
//! ```text
//! ── Smart Basket ───────────────────────────────
//!   Apple                     2 x ₱2.50
//!   Bread                     1 x ₱1.20
//!   TOTAL: ₱6.20
//!   Budget: ₱10.00 (warning above ₱9.00)  [WARNING]
//! ```

use basket_core::{BasketSnapshot, BudgetStatus, CheckoutPayload, Money, WARNING_THRESHOLD_BPS};
use basket_engine::config::StoreSettings;
use basket_engine::{BasketObserver, Notice, ResolvedScan, Resolution};

const RULE_WIDTH: usize = 48;

/// Prints the basket after every change.
pub struct ConsoleObserver {
    title: String,
    symbol: String,
}

impl ConsoleObserver {
    /// Creates an observer for a store's branding.
    pub fn new(store: &StoreSettings) -> Self {
        ConsoleObserver {
            title: store.name.clone(),
            symbol: store.currency_symbol.clone(),
        }
    }
}

impl BasketObserver for ConsoleObserver {
    fn basket_changed(&self, snapshot: &BasketSnapshot) {
        println!("{}", render_snapshot(&self.title, &self.symbol, snapshot));
    }

    fn notify(&self, notice: &Notice) {
        println!("{}", render_notice(notice));
    }

    fn scan_ignored(&self, scan: &ResolvedScan) {
        println!("{}", render_ignored(scan));
    }

    fn checkout_ready(&self, payload: &CheckoutPayload) {
        println!("{}", render_payload(payload));
    }
}

/// Formats the basket table, total, budget and status.
pub fn render_snapshot(title: &str, symbol: &str, snapshot: &BasketSnapshot) -> String {
    let mut out = Vec::new();

    let head = format!("── {} ", title);
    let pad = RULE_WIDTH.saturating_sub(head.chars().count());
    out.push(format!("{}{}", head, "─".repeat(pad)));

    if snapshot.items.is_empty() {
        out.push("  (basket is empty)".to_string());
    }

    for line in &snapshot.items {
        let price = Money::from_cents(line.unit_price_cents).format_with_symbol(symbol);
        let marker = if line.mixed_prices { " *" } else { "" };
        out.push(format!(
            "  {:<24} {:>3} x {}{}",
            line.name, line.quantity, price, marker
        ));
    }

    out.push(format!("  TOTAL: {}", snapshot.total().format_with_symbol(symbol)));

    match snapshot.budget_cents.map(Money::from_cents) {
        Some(budget) => out.push(format!(
            "  Budget: {} (warning above {})  [{}]",
            budget.format_with_symbol(symbol),
            budget
                .portion_bps(WARNING_THRESHOLD_BPS)
                .format_with_symbol(symbol),
            status_label(snapshot.status)
        )),
        None => out.push("  Budget: not set".to_string()),
    }

    out.join("\n")
}

fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::None => "NO BUDGET",
        BudgetStatus::Safe => "OK",
        BudgetStatus::Warning => "WARNING",
        BudgetStatus::Over => "OVER BUDGET",
    }
}

/// Formats a customer notice.
pub fn render_notice(notice: &Notice) -> String {
    format!("!! {}", notice)
}

/// Formats an ignored scan.
pub fn render_ignored(scan: &ResolvedScan) -> String {
    match &scan.resolution {
        Resolution::Unavailable(_) => format!(
            "?? Could not look up {} right now, please scan again",
            scan.identifier
        ),
        _ => format!("?? Unknown item {}, scan ignored", scan.identifier),
    }
}

/// Formats the checkout payload for display (and for a QR encoder).
pub fn render_payload(payload: &CheckoutPayload) -> String {
    format!(
        "==== CHECKOUT {} ====\n{}\n{}",
        payload.checkout_id,
        payload.text,
        "=".repeat(RULE_WIDTH)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{BasketSession, Budget, Product, Tag};

    fn session() -> BasketSession {
        let mut session = BasketSession::with_budget(Budget::from_money(Money::from_cents(400)));
        session.apply_scan(Tag::parse("A1").unwrap(), Product::new("RT101", "Apple", 250));
        session.apply_scan(Tag::parse("B1").unwrap(), Product::new("RT103", "Bread", 120));
        session
    }

    #[test]
    fn test_render_snapshot() {
        let text = render_snapshot("Smart Basket", "₱", session().snapshot());

        assert!(text.starts_with("── Smart Basket "));
        let apple = text.find("Apple").unwrap();
        let bread = text.find("Bread").unwrap();
        assert!(apple < bread);
        assert!(text.contains("TOTAL: ₱3.70"));
        assert!(text.contains("Budget: ₱4.00 (warning above ₱3.60)  [WARNING]"));
    }

    #[test]
    fn test_render_empty_basket() {
        let text = render_snapshot("Kiosk", "$", BasketSession::new().snapshot());
        assert!(text.contains("(basket is empty)"));
        assert!(text.contains("TOTAL: $0.00"));
        assert!(text.contains("Budget: not set"));
    }

    #[test]
    fn test_render_payload_keeps_text_verbatim() {
        let payload = session().checkout().unwrap();
        let rendered = render_payload(&payload);
        assert!(rendered.contains(&payload.text));
        assert!(!payload.text.contains('₱'));
    }

    #[test]
    fn test_render_ignored() {
        let scan = ResolvedScan {
            identifier: "RT999".into(),
            tag: Tag::parse("Z1").unwrap(),
            resolution: Resolution::NotFound,
        };
        assert!(render_ignored(&scan).contains("Unknown item RT999"));
    }
}
