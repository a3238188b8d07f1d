//! # Console Input
//!
//! One stdin line is either a scan or a `:`-prefixed command.
//!
//! ```text
//! "RT101 A1"        → Scan { identifier: RT101, tag: A1 }
//! "RT101"           → Scan { identifier: RT101, tag: none }
//! ":budget 99.50"   → Budget("99.50")
//! ":checkout"       → Checkout
//! ":reset"          → Reset
//! ":show" / ":json" → Show / Json
//! ":quit"           → Quit
//! ```

use basket_engine::{parse_scan_line, RawScan};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskInput {
    Scan(RawScan),
    Budget(String),
    Checkout,
    Reset,
    Show,
    Json,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Option<KioskInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix(':') else {
        return parse_scan_line(line).map(KioskInput::Scan);
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    let input = match name.to_lowercase().as_str() {
        "budget" | "b" => KioskInput::Budget(rest.to_string()),
        "checkout" | "c" => KioskInput::Checkout,
        "reset" | "r" => KioskInput::Reset,
        "show" | "s" => KioskInput::Show,
        "json" => KioskInput::Json,
        "help" | "h" | "?" => KioskInput::Help,
        "quit" | "q" | "exit" => KioskInput::Quit,
        _ => KioskInput::Unknown(name.to_string()),
    };
    Some(input)
}

/// Console help text.
pub const USAGE: &str = "\
Scan:      <identifier> [tag]     e.g. RT101 A1 (same tag again removes it)
Commands:  :budget <amount>       set the budget (0 clears it)
           :checkout              show the checkout payload
           :reset                 empty the basket
           :show | :json          print the basket
           :help | :quit";
